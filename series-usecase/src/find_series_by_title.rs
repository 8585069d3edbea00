use std::time::Duration;

use series_common::{
    models::Series,
    repository::{SeriesRepository, Store},
    Error,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FoundSeries {
    pub id: String,
    pub title: String,
    pub begin_year: i32,
    pub end_year: i32,
    pub creator: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FindSeriesByTitleOutput {
    pub series: Vec<FoundSeries>,
}

pub trait FindSeriesByTitlePresenter: Send + Sync {
    fn output(&self, series: &[Series]) -> FindSeriesByTitleOutput;
}

pub struct FindSeriesByTitleInteractor<S, P> {
    store: S,
    presenter: P,
    timeout: Duration,
}

impl<S, P> FindSeriesByTitleInteractor<S, P>
where
    S: Store,
    P: FindSeriesByTitlePresenter,
{
    pub fn new(store: S, presenter: P, timeout: Duration) -> Self {
        Self {
            store,
            presenter,
            timeout,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, query: &str) -> Result<FindSeriesByTitleOutput, Error> {
        let series = tokio::time::timeout(self.timeout, async {
            let mut session = self.store.session().await?;

            session.find_by_title(query).await
        })
        .await??;

        Ok(self.presenter.output(&series))
    }
}
