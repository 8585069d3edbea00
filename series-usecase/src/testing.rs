//! Store doubles for the failure paths the in-memory store never hits.

use std::time::Duration;

use futures::future::BoxFuture;
use series_common::{models::AuthorId, repository::Store, Error};
use series_queries::memory::MemorySession;

pub const TIMEOUT: Duration = Duration::from_millis(200);

pub fn author() -> AuthorId {
    AuthorId::from_uuid(uuid::Uuid::new_v4())
}

fn unavailable() -> Error {
    Error::storage(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "database unavailable",
    ))
}

/// Every operation fails as if the database were unreachable.
#[derive(Clone)]
pub struct BrokenStore;

#[async_trait::async_trait]
impl Store for BrokenStore {
    type Session = MemorySession;
    type Transaction = MemorySession;

    async fn session(&self) -> Result<Self::Session, Error> {
        Err(unavailable())
    }

    async fn with_transaction<T, F>(&self, _f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut Self::Transaction) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static,
    {
        Err(unavailable())
    }
}

/// Never answers.
#[derive(Clone)]
pub struct StalledStore;

#[async_trait::async_trait]
impl Store for StalledStore {
    type Session = MemorySession;
    type Transaction = MemorySession;

    async fn session(&self) -> Result<Self::Session, Error> {
        futures::future::pending().await
    }

    async fn with_transaction<T, F>(&self, _f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut Self::Transaction) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static,
    {
        futures::future::pending().await
    }
}
