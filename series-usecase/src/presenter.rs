use series_common::models::{Review, Series};

use crate::{
    create_review::{CreateReviewOutput, CreateReviewPresenter},
    create_series::{CreateSeriesOutput, CreateSeriesPresenter},
    find_reviews_by_series::{FindReviewsBySeriesOutput, FindReviewsBySeriesPresenter},
    find_series_by_id::{FindSeriesByIdOutput, FindSeriesByIdPresenter},
    find_series_by_title::{FindSeriesByTitleOutput, FindSeriesByTitlePresenter, FoundSeries},
    SeriesReview,
};

/// Presents entities as the flat JSON shapes served by the API.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPresenter;

fn series_review(review: &Review) -> SeriesReview {
    SeriesReview {
        id: review.id().to_string(),
        author_id: review.author_id().to_string(),
        text: review.text().to_owned(),
    }
}

impl CreateSeriesPresenter for DefaultPresenter {
    fn output(&self, series: &Series) -> CreateSeriesOutput {
        CreateSeriesOutput {
            id: series.id().to_string(),
            title: series.title().to_owned(),
            description: series.description().to_owned(),
            episodes: series.episodes(),
            begin_year: series.begin_year(),
            end_year: series.end_year(),
            creator: series.creator().to_owned(),
        }
    }
}

impl CreateReviewPresenter for DefaultPresenter {
    fn output(&self, review: &Review) -> CreateReviewOutput {
        CreateReviewOutput {
            id: review.id().to_string(),
            series_id: review.series_id().to_string(),
            author_id: review.author_id().to_string(),
            text: review.text().to_owned(),
        }
    }
}

impl FindSeriesByIdPresenter for DefaultPresenter {
    fn output(&self, series: &Series, reviews: &[Review]) -> FindSeriesByIdOutput {
        FindSeriesByIdOutput {
            id: series.id().to_string(),
            title: series.title().to_owned(),
            description: series.description().to_owned(),
            episodes: series.episodes(),
            begin_year: series.begin_year(),
            end_year: series.end_year(),
            creator: series.creator().to_owned(),
            reviews: reviews.iter().map(series_review).collect(),
        }
    }
}

impl FindSeriesByTitlePresenter for DefaultPresenter {
    fn output(&self, series: &[Series]) -> FindSeriesByTitleOutput {
        FindSeriesByTitleOutput {
            series: series
                .iter()
                .map(|series| FoundSeries {
                    id: series.id().to_string(),
                    title: series.title().to_owned(),
                    begin_year: series.begin_year(),
                    end_year: series.end_year(),
                    creator: series.creator().to_owned(),
                })
                .collect(),
        }
    }
}

impl FindReviewsBySeriesPresenter for DefaultPresenter {
    fn output(&self, reviews: &[Review]) -> FindReviewsBySeriesOutput {
        FindReviewsBySeriesOutput {
            reviews: reviews.iter().map(series_review).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use series_common::models::{AuthorId, ReviewId, SeriesId};

    use super::*;

    fn series() -> Series {
        Series::new(SeriesId::new(), "Title", "Description", 20, 1980, 1990, "Creator")
    }

    fn review(series_id: SeriesId) -> Review {
        let author_id = "c2d29867-3d0b-d497-9191-18a9d8ee7830".parse::<AuthorId>().unwrap();

        Review::new(ReviewId::new(), series_id, author_id, "Review text")
    }

    #[test]
    fn create_series_output() {
        let series = series();

        let json = serde_json::to_value(CreateSeriesPresenter::output(&DefaultPresenter, &series)).unwrap();

        assert_eq!(
            json,
            json!({
                "id": series.id().to_string(),
                "title": "Title",
                "description": "Description",
                "episodes": 20,
                "begin_year": 1980,
                "end_year": 1990,
                "creator": "Creator",
            })
        );
    }

    #[test]
    fn create_review_output() {
        let review = review(SeriesId::new());

        let json = serde_json::to_value(CreateReviewPresenter::output(&DefaultPresenter, &review)).unwrap();

        assert_eq!(
            json,
            json!({
                "id": review.id().to_string(),
                "series_id": review.series_id().to_string(),
                "author_id": "c2d29867-3d0b-d497-9191-18a9d8ee7830",
                "text": "Review text",
            })
        );
    }

    #[test]
    fn find_series_by_id_output() {
        let series = series();
        let review = review(series.id());

        let output = FindSeriesByIdPresenter::output(&DefaultPresenter, &series, &[review.clone()]);

        assert_eq!(output.title, "Title");
        assert_eq!(
            output.reviews,
            vec![SeriesReview {
                id: review.id().to_string(),
                author_id: review.author_id().to_string(),
                text: "Review text".into(),
            }]
        );

        let empty = FindSeriesByIdPresenter::output(&DefaultPresenter, &series, &[]);
        assert_eq!(serde_json::to_value(empty).unwrap()["reviews"], json!([]));
    }

    #[test]
    fn find_series_by_title_output() {
        let series = series();

        let json = serde_json::to_value(FindSeriesByTitlePresenter::output(
            &DefaultPresenter,
            std::slice::from_ref(&series),
        ))
        .unwrap();

        assert_eq!(
            json,
            json!({
                "series": [{
                    "id": series.id().to_string(),
                    "title": "Title",
                    "begin_year": 1980,
                    "end_year": 1990,
                    "creator": "Creator",
                }]
            })
        );

        let empty = FindSeriesByTitlePresenter::output(&DefaultPresenter, &[]);
        assert_eq!(serde_json::to_value(empty).unwrap(), json!({ "series": [] }));
    }

    #[test]
    fn find_reviews_by_series_output() {
        let empty = FindReviewsBySeriesPresenter::output(&DefaultPresenter, &[]);

        assert_eq!(serde_json::to_value(empty).unwrap(), json!({ "reviews": [] }));
    }
}
