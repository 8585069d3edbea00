//! Persistence contracts shared by the interactors and the storage adapters.

use futures::future::BoxFuture;

use crate::{
    models::{AuthorId, Review, Series, SeriesId},
    Error,
};

#[async_trait::async_trait]
pub trait SeriesRepository: Send {
    /// Persists a fully formed series and hands it back unchanged.
    async fn create(&mut self, series: Series) -> Result<Series, Error>;

    /// Full text search over title and description; the query is passed to
    /// the store verbatim.
    async fn find_by_title(&mut self, query: &str) -> Result<Vec<Series>, Error>;

    /// Fails with [`Error::SeriesNotFound`] when there is no such series.
    async fn find_by_id(&mut self, id: SeriesId) -> Result<Series, Error>;
}

#[async_trait::async_trait]
pub trait ReviewRepository: Send {
    async fn create(&mut self, review: Review) -> Result<Review, Error>;

    async fn find_by_series(&mut self, series_id: SeriesId) -> Result<Vec<Review>, Error>;

    /// Fails with [`Error::AlreadyReviewed`] when `author_id` already has a
    /// review for `series_id`.
    async fn reviewed(&mut self, series_id: SeriesId, author_id: AuthorId) -> Result<(), Error>;
}

/// Hands out repository sessions and scopes transactions.
///
/// A session is bound to a single connection for as long as it lives, so
/// interactors acquire one per unit of work and drop it afterwards.
#[async_trait::async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Session: SeriesRepository + ReviewRepository;
    type Transaction: SeriesRepository + ReviewRepository;

    async fn session(&self) -> Result<Self::Session, Error>;

    /// Runs `f` inside a transaction, committing when it returns `Ok` and
    /// rolling back otherwise.
    ///
    /// Dropping the returned future before it resolves rolls the transaction
    /// back. A failed rollback is reported in place of the error returned by
    /// `f`.
    async fn with_transaction<T, F>(&self, f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut Self::Transaction) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static;
}
