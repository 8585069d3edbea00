pub mod memory;

use std::{ops::DerefMut, time::Duration};

use futures::future::BoxFuture;
use series_common::{
    models::{AuthorId, Review, ReviewId, Series, SeriesId},
    repository::{ReviewRepository, SeriesRepository, Store},
    Conf, Error,
};
use sqlx::{
    migrate::Migrator,
    pool::PoolConnection,
    postgres::{PgConnection, PgPoolOptions},
    types::Uuid,
    Postgres, Transaction,
};

pub use memory::MemoryStore;
pub use sqlx::PgPool as Pool;

pub type PgTransaction = Transaction<'static, Postgres>;

static MIGRATOR: Migrator = sqlx::migrate!();

const RETRY_DELAY: Duration = Duration::from_secs(5);

#[tracing::instrument(skip(conf), err)]
pub async fn init_database_connection(conf: &Conf) -> Result<Pool, series_common::Report> {
    let attempts = conf.connect_retries();
    let mut attempt = 1;

    let pool = loop {
        match PgPoolOptions::new().connect(&conf.database).await {
            Ok(pool) => break pool,
            Err(err) if attempt < attempts => {
                tracing::warn!(err = %err, attempt, "unable to connect to database, retrying");

                tokio::time::sleep(RETRY_DELAY).await;
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    };

    Ok(pool)
}

#[tracing::instrument(skip(pool), err)]
pub async fn migrate(pool: &Pool) -> Result<(), series_common::Report> {
    MIGRATOR.run(pool).await?;

    tracing::info!("database migrations applied");

    Ok(())
}

/// PostgreSQL backed [`Store`].
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    type Session = PgSession<PoolConnection<Postgres>>;
    type Transaction = PgSession<PgTransaction>;

    async fn session(&self) -> Result<Self::Session, Error> {
        let conn = self.pool.acquire().await.map_err(Error::storage)?;

        Ok(PgSession(conn))
    }

    #[tracing::instrument(skip(self, f))]
    async fn with_transaction<T, F>(&self, f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut Self::Transaction) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static,
    {
        let trans = self.pool.begin().await.map_err(Error::storage)?;
        let mut session = PgSession(trans);

        match f(&mut session).await {
            Ok(value) => {
                session.0.commit().await.map_err(Error::storage)?;

                Ok(value)
            }
            Err(err) => {
                if !err.is_domain() {
                    tracing::warn!(err = %err, "rolling back transaction");
                }

                match session.0.rollback().await {
                    Ok(()) => Err(err),
                    Err(rollback) => {
                        tracing::error!(err = %err, "transaction rollback failed, original error dropped");

                        Err(Error::storage(rollback))
                    }
                }
            }
        }
    }
}

/// Repository session over a pooled connection or an open transaction.
pub struct PgSession<C>(C);

#[derive(sqlx::FromRow)]
struct SeriesRow {
    id: Uuid,
    title: String,
    description: String,
    episodes: i32,
    begin_year: i32,
    end_year: i32,
    creator: String,
}

impl From<SeriesRow> for Series {
    fn from(row: SeriesRow) -> Self {
        Series::new(
            SeriesId::from_uuid(row.id),
            row.title,
            row.description,
            row.episodes,
            row.begin_year,
            row.end_year,
            row.creator,
        )
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    series_id: Uuid,
    author_id: Uuid,
    text: String,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review::new(
            ReviewId::from_uuid(row.id),
            SeriesId::from_uuid(row.series_id),
            AuthorId::from_uuid(row.author_id),
            row.text,
        )
    }
}

#[async_trait::async_trait]
impl<C> SeriesRepository for PgSession<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    #[tracing::instrument(skip(self, series), fields(series_id = %series.id()), err)]
    async fn create(&mut self, series: Series) -> Result<Series, Error> {
        sqlx::query(
            "INSERT INTO series(id, title, description, episodes, begin_year, end_year, creator) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(series.id().as_uuid())
        .bind(series.title())
        .bind(series.description())
        .bind(series.episodes())
        .bind(series.begin_year())
        .bind(series.end_year())
        .bind(series.creator())
        .execute(&mut *self.0)
        .await
        .map_err(Error::storage)?;

        Ok(series)
    }

    #[tracing::instrument(skip(self), err)]
    async fn find_by_title(&mut self, query: &str) -> Result<Vec<Series>, Error> {
        let rows = sqlx::query_as::<_, SeriesRow>(
            "SELECT id, title, description, episodes, begin_year, end_year, creator FROM series WHERE make_tsvector(title, description) @@ to_tsquery($1) ORDER BY created",
        )
        .bind(query)
        .fetch_all(&mut *self.0)
        .await
        .map_err(Error::storage)?;

        Ok(rows.into_iter().map(Series::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&mut self, id: SeriesId) -> Result<Series, Error> {
        let row = sqlx::query_as::<_, SeriesRow>(
            "SELECT id, title, description, episodes, begin_year, end_year, creator FROM series WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *self.0)
        .await
        .map_err(Error::storage)?;

        row.map(Series::from).ok_or(Error::SeriesNotFound)
    }
}

#[async_trait::async_trait]
impl<C> ReviewRepository for PgSession<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    #[tracing::instrument(skip(self, review), fields(review_id = %review.id()))]
    async fn create(&mut self, review: Review) -> Result<Review, Error> {
        let res = sqlx::query(
            "INSERT INTO reviews(id, series_id, author_id, text) VALUES ($1, $2, $3, $4)",
        )
        .bind(review.id().as_uuid())
        .bind(review.series_id().as_uuid())
        .bind(review.author_id().as_uuid())
        .bind(review.text())
        .execute(&mut *self.0)
        .await;

        match res {
            Ok(_) => Ok(review),
            // a concurrent insert for the same pair committed first
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(Error::AlreadyReviewed)
            }
            Err(err) => Err(Error::storage(err)),
        }
    }

    #[tracing::instrument(skip(self), err)]
    async fn find_by_series(&mut self, series_id: SeriesId) -> Result<Vec<Review>, Error> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, series_id, author_id, text FROM reviews WHERE series_id = $1 ORDER BY created",
        )
        .bind(series_id.as_uuid())
        .fetch_all(&mut *self.0)
        .await
        .map_err(Error::storage)?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn reviewed(&mut self, series_id: SeriesId, author_id: AuthorId) -> Result<(), Error> {
        let existing = sqlx::query("SELECT id FROM reviews WHERE series_id = $1 AND author_id = $2")
            .bind(series_id.as_uuid())
            .bind(author_id.as_uuid())
            .fetch_optional(&mut *self.0)
            .await
            .map_err(Error::storage)?;

        match existing {
            Some(_) => Err(Error::AlreadyReviewed),
            None => Ok(()),
        }
    }
}
