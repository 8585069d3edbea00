use std::time::Duration;

use futures::FutureExt as _;
use series_common::{
    models::{Review, SeriesId},
    repository::{ReviewRepository, SeriesRepository, Store},
    Error,
};

use crate::SeriesReview;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FindReviewsBySeriesOutput {
    pub reviews: Vec<SeriesReview>,
}

pub trait FindReviewsBySeriesPresenter: Send + Sync {
    fn output(&self, reviews: &[Review]) -> FindReviewsBySeriesOutput;
}

pub struct FindReviewsBySeriesInteractor<S, P> {
    store: S,
    presenter: P,
    timeout: Duration,
}

impl<S, P> FindReviewsBySeriesInteractor<S, P>
where
    S: Store,
    P: FindReviewsBySeriesPresenter,
{
    pub fn new(store: S, presenter: P, timeout: Duration) -> Self {
        Self {
            store,
            presenter,
            timeout,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, series_id: SeriesId) -> Result<FindReviewsBySeriesOutput, Error> {
        let reviews = tokio::time::timeout(
            self.timeout,
            self.store.with_transaction(move |trans| {
                async move {
                    trans.find_by_id(series_id).await?;

                    trans.find_by_series(series_id).await
                }
                .boxed()
            }),
        )
        .await??;

        Ok(self.presenter.output(&reviews))
    }
}
