//! Use case interactors.
//!
//! Each interactor is built once with an injected [`Store`] and presenter,
//! expects input that already passed field validation, and bounds its whole
//! unit of work, transaction included, by a deadline.
//!
//! [`Store`]: series_common::repository::Store

pub mod create_review;
pub mod create_series;
pub mod find_reviews_by_series;
pub mod find_series_by_id;
pub mod find_series_by_title;
pub mod presenter;

#[cfg(test)]
mod testing;

pub use create_review::{CreateReviewInput, CreateReviewInteractor, CreateReviewOutput};
pub use create_series::{CreateSeriesInput, CreateSeriesInteractor, CreateSeriesOutput};
pub use find_reviews_by_series::{FindReviewsBySeriesInteractor, FindReviewsBySeriesOutput};
pub use find_series_by_id::{FindSeriesByIdInteractor, FindSeriesByIdOutput};
pub use find_series_by_title::{FindSeriesByTitleInteractor, FindSeriesByTitleOutput};
pub use presenter::DefaultPresenter;

/// Review as listed under a series, without the redundant series id.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SeriesReview {
    pub id: String,
    pub author_id: String,
    pub text: String,
}
