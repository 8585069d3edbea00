use std::time::Duration;

use futures::FutureExt as _;
use series_common::{
    models::{AuthorId, Review, ReviewId, SeriesId},
    repository::{ReviewRepository, SeriesRepository, Store},
    Error,
};

#[derive(Clone, Debug, serde::Deserialize, garde::Validate)]
pub struct CreateReviewInput {
    #[garde(skip)]
    pub series_id: SeriesId,
    #[garde(skip)]
    pub author_id: AuthorId,
    /// Missing text is reported by validation like any other bad text.
    #[serde(default)]
    #[garde(length(chars, min = 1, max = 500))]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CreateReviewOutput {
    pub id: String,
    pub series_id: String,
    pub author_id: String,
    pub text: String,
}

pub trait CreateReviewPresenter: Send + Sync {
    fn output(&self, review: &Review) -> CreateReviewOutput;
}

/// Creates the review of an author for a series.
///
/// The series lookup, the uniqueness check and the insert share one
/// transaction; whichever of two racing requests commits second fails with
/// [`Error::AlreadyReviewed`] and leaves nothing behind.
pub struct CreateReviewInteractor<S, P> {
    store: S,
    presenter: P,
    timeout: Duration,
}

impl<S, P> CreateReviewInteractor<S, P>
where
    S: Store,
    P: CreateReviewPresenter,
{
    pub fn new(store: S, presenter: P, timeout: Duration) -> Self {
        Self {
            store,
            presenter,
            timeout,
        }
    }

    #[tracing::instrument(skip(self, input), fields(series_id = %input.series_id, author_id = %input.author_id))]
    pub async fn execute(&self, input: CreateReviewInput) -> Result<CreateReviewOutput, Error> {
        let CreateReviewInput {
            series_id,
            author_id,
            text,
        } = input;

        let review = tokio::time::timeout(
            self.timeout,
            self.store.with_transaction(move |trans| {
                async move {
                    trans.find_by_id(series_id).await?;
                    trans.reviewed(series_id, author_id).await?;

                    let review = Review::new(ReviewId::new(), series_id, author_id, text);

                    ReviewRepository::create(trans, review).await
                }
                .boxed()
            }),
        )
        .await??;

        Ok(self.presenter.output(&review))
    }
}
