use std::time::Duration;

use futures::FutureExt as _;
use series_common::{
    models::{Review, Series, SeriesId},
    repository::{ReviewRepository, SeriesRepository, Store},
    Error,
};

use crate::SeriesReview;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FindSeriesByIdOutput {
    pub id: String,
    pub title: String,
    pub description: String,
    pub episodes: i32,
    pub begin_year: i32,
    pub end_year: i32,
    pub creator: String,
    pub reviews: Vec<SeriesReview>,
}

pub trait FindSeriesByIdPresenter: Send + Sync {
    fn output(&self, series: &Series, reviews: &[Review]) -> FindSeriesByIdOutput;
}

pub struct FindSeriesByIdInteractor<S, P> {
    store: S,
    presenter: P,
    timeout: Duration,
}

impl<S, P> FindSeriesByIdInteractor<S, P>
where
    S: Store,
    P: FindSeriesByIdPresenter,
{
    pub fn new(store: S, presenter: P, timeout: Duration) -> Self {
        Self {
            store,
            presenter,
            timeout,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: SeriesId) -> Result<FindSeriesByIdOutput, Error> {
        let (series, reviews) = tokio::time::timeout(
            self.timeout,
            self.store.with_transaction(move |trans| {
                async move {
                    let series = trans.find_by_id(id).await?;
                    let reviews = trans.find_by_series(id).await?;

                    Ok::<_, Error>((series, reviews))
                }
                .boxed()
            }),
        )
        .await??;

        Ok(self.presenter.output(&series, &reviews))
    }
}
