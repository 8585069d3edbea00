use std::time::Duration;

use series_common::{
    models::{Series, SeriesId},
    repository::{SeriesRepository, Store},
    Error,
};

#[derive(Clone, Debug, Default, serde::Deserialize, garde::Validate)]
#[serde(default)]
pub struct CreateSeriesInput {
    #[garde(length(chars, min = 1, max = 70))]
    pub title: String,
    #[garde(length(chars, min = 1, max = 200))]
    pub description: String,
    #[garde(range(min = 1))]
    pub episodes: i32,
    #[garde(range(min = 1946, max = 2030))]
    pub begin_year: i32,
    #[garde(custom(ongoing_or_not_before(self.begin_year)))]
    pub end_year: i32,
    #[garde(length(chars, min = 5, max = 30))]
    pub creator: String,
}

/// `0` marks a running series; anything else may not precede the first year.
fn ongoing_or_not_before(begin_year: i32) -> impl FnOnce(&i32, &()) -> garde::Result {
    move |end_year, _| {
        if *end_year == 0 || *end_year >= begin_year {
            Ok(())
        } else {
            Err(garde::Error::new(format!(
                "must be 0 or greater than or equal to begin_year ({})",
                begin_year
            )))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CreateSeriesOutput {
    pub id: String,
    pub title: String,
    pub description: String,
    pub episodes: i32,
    pub begin_year: i32,
    pub end_year: i32,
    pub creator: String,
}

pub trait CreateSeriesPresenter: Send + Sync {
    fn output(&self, series: &Series) -> CreateSeriesOutput;
}

pub struct CreateSeriesInteractor<S, P> {
    store: S,
    presenter: P,
    timeout: Duration,
}

impl<S, P> CreateSeriesInteractor<S, P>
where
    S: Store,
    P: CreateSeriesPresenter,
{
    pub fn new(store: S, presenter: P, timeout: Duration) -> Self {
        Self {
            store,
            presenter,
            timeout,
        }
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn execute(&self, input: CreateSeriesInput) -> Result<CreateSeriesOutput, Error> {
        let series = Series::new(
            SeriesId::new(),
            input.title,
            input.description,
            input.episodes,
            input.begin_year,
            input.end_year,
            input.creator,
        );

        let series = tokio::time::timeout(self.timeout, async {
            let mut session = self.store.session().await?;

            SeriesRepository::create(&mut session, series).await
        })
        .await??;

        tracing::debug!(series_id = %series.id(), "series created");

        Ok(self.presenter.output(&series))
    }
}
