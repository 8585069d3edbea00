//! In-process [`Store`] used by the test suites and `--database memory`.
//!
//! Every session holds the store lock for its whole lifetime, so
//! transactions are fully serialized. Writes made inside a transaction are
//! undone when the session is dropped without committing.
//!
//! Title search only approximates PostgreSQL full-text search. Terms are
//! matched as case-insensitive substrings, with no stemming or ranking. A
//! query that PostgreSQL would refuse to parse, such as two bare terms with
//! no operator between them, is refused here too.

use std::{io, sync::Arc};

use futures::future::BoxFuture;
use series_common::{
    models::{AuthorId, Review, Series, SeriesId},
    repository::{ReviewRepository, SeriesRepository, Store},
    Error,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Debug, Default)]
struct Tables {
    series: Vec<Series>,
    reviews: Vec<Review>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn series_count(&self) -> usize {
        self.tables.lock().await.series.len()
    }

    pub async fn review_count(&self) -> usize {
        self.tables.lock().await.reviews.len()
    }
}

pub struct MemorySession {
    tables: OwnedMutexGuard<Tables>,
    snapshot: Option<Tables>,
}

impl MemorySession {
    fn commit(&mut self) {
        self.snapshot = None;
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            tracing::debug!("rolling back uncommitted memory transaction");

            *self.tables = snapshot;
        }
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    type Session = MemorySession;
    type Transaction = MemorySession;

    async fn session(&self) -> Result<Self::Session, Error> {
        Ok(MemorySession {
            tables: self.tables.clone().lock_owned().await,
            snapshot: None,
        })
    }

    async fn with_transaction<T, F>(&self, f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t mut Self::Transaction) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static,
    {
        let tables = self.tables.clone().lock_owned().await;
        let snapshot = tables.clone();
        let mut session = MemorySession {
            tables,
            snapshot: Some(snapshot),
        };

        let value = f(&mut session).await?;

        session.commit();

        Ok(value)
    }
}

/// Whether `query` puts two operands next to each other without an
/// operator, which `to_tsquery` reports as a syntax error.
fn missing_operator(query: &str) -> bool {
    let mut after_operand = false;
    let mut in_term = false;
    let mut in_label = false;

    for c in query.chars() {
        match c {
            c if c.is_whitespace() => {
                in_term = false;
                in_label = false;
            }
            // `:*` prefix marker and `:AB` weight labels stay on the operand
            ':' => {
                in_term = false;
                in_label = true;
            }
            ')' => {
                in_term = false;
                in_label = false;
                after_operand = true;
            }
            '&' | '|' | '!' | '(' | '<' | '>' | '-' => {
                in_term = false;
                in_label = false;
                after_operand = false;
            }
            _ if in_label || in_term => {}
            _ => {
                if after_operand {
                    return true;
                }

                in_term = true;
                after_operand = true;
            }
        }
    }

    false
}

/// Loose stand-in for `to_tsquery`: every term, stripped of tsquery
/// operators, has to occur in the title or the description.
fn matches(series: &Series, query: &str) -> bool {
    let haystack = format!("{} {}", series.title(), series.description()).to_lowercase();

    let mut terms = query
        .split(|c: char| c.is_whitespace() || "&|!():*<>-".contains(c))
        .filter(|term| !term.is_empty())
        .peekable();

    terms.peek().is_some() && terms.all(|term| haystack.contains(&term.to_lowercase()))
}

#[async_trait::async_trait]
impl SeriesRepository for MemorySession {
    async fn create(&mut self, series: Series) -> Result<Series, Error> {
        self.tables.series.push(series.clone());

        Ok(series)
    }

    async fn find_by_title(&mut self, query: &str) -> Result<Vec<Series>, Error> {
        if missing_operator(query) {
            return Err(Error::storage(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("syntax error in tsquery: \"{}\"", query),
            )));
        }

        Ok(self
            .tables
            .series
            .iter()
            .filter(|series| matches(series, query))
            .cloned()
            .collect())
    }

    async fn find_by_id(&mut self, id: SeriesId) -> Result<Series, Error> {
        self.tables
            .series
            .iter()
            .find(|series| series.id() == id)
            .cloned()
            .ok_or(Error::SeriesNotFound)
    }
}

#[async_trait::async_trait]
impl ReviewRepository for MemorySession {
    async fn create(&mut self, review: Review) -> Result<Review, Error> {
        let duplicate = self.tables.reviews.iter().any(|existing| {
            existing.series_id() == review.series_id() && existing.author_id() == review.author_id()
        });

        if duplicate {
            return Err(Error::AlreadyReviewed);
        }

        self.tables.reviews.push(review.clone());

        Ok(review)
    }

    async fn find_by_series(&mut self, series_id: SeriesId) -> Result<Vec<Review>, Error> {
        Ok(self
            .tables
            .reviews
            .iter()
            .filter(|review| review.series_id() == series_id)
            .cloned()
            .collect())
    }

    async fn reviewed(&mut self, series_id: SeriesId, author_id: AuthorId) -> Result<(), Error> {
        let found = self
            .tables
            .reviews
            .iter()
            .any(|review| review.series_id() == series_id && review.author_id() == author_id);

        if found {
            Err(Error::AlreadyReviewed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt as _;
    use series_common::models::ReviewId;

    use super::*;

    fn series(title: &str, description: &str) -> Series {
        Series::new(SeriesId::new(), title, description, 10, 2000, 0, "Creator")
    }

    #[tokio::test]
    async fn find_by_id_reports_missing_series() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        let err = session.find_by_id(SeriesId::new()).await.unwrap_err();

        assert!(matches!(err, Error::SeriesNotFound));
    }

    #[tokio::test]
    async fn title_search_matches_title_and_description() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        SeriesRepository::create(&mut session, series("The Wire", "Baltimore drug trade"))
            .await
            .unwrap();
        SeriesRepository::create(&mut session, series("Twin Peaks", "A murder in a small town"))
            .await
            .unwrap();

        let found = session.find_by_title("wire").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "The Wire");

        let found = session.find_by_title("small & town").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title(), "Twin Peaks");

        assert!(session.find_by_title("sopranos").await.unwrap().is_empty());
        assert!(session.find_by_title("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn title_search_refuses_terms_without_operator() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();

        SeriesRepository::create(&mut session, series("Twin Peaks", "A murder in a small town"))
            .await
            .unwrap();

        for query in ["small town", "(small | big) town", "twin peaks:*"] {
            let err = session.find_by_title(query).await.unwrap_err();
            assert!(matches!(err, Error::Storage(_)), "{}", query);
        }

        for query in ["small <-> town", "(small | big) & town", "twin:* & !wire", "peak:AB"] {
            assert!(session.find_by_title(query).await.is_ok(), "{}", query);
        }
    }

    #[tokio::test]
    async fn failed_transaction_is_rolled_back() {
        let store = MemoryStore::new();

        let res: Result<(), Error> = store
            .with_transaction(|trans| {
                async move {
                    SeriesRepository::create(trans, series("Title", "Description")).await?;

                    Err(Error::SeriesNotFound)
                }
                .boxed()
            })
            .await;

        assert!(matches!(res, Err(Error::SeriesNotFound)));
        assert_eq!(store.series_count().await, 0);
    }

    #[tokio::test]
    async fn dropped_transaction_is_rolled_back() {
        let store = MemoryStore::new();
        let series_id = SeriesId::new();
        let author_id = AuthorId::from_uuid(uuid_for_author());

        let fut = store.with_transaction(move |trans| {
            async move {
                ReviewRepository::create(
                    trans,
                    Review::new(ReviewId::new(), series_id, author_id, "text"),
                )
                .await?;

                futures::future::pending::<()>().await;

                Ok::<_, Error>(())
            }
            .boxed()
        });

        let res = tokio::time::timeout(std::time::Duration::from_millis(20), fut).await;

        assert!(res.is_err());
        assert_eq!(store.review_count().await, 0);
    }

    #[tokio::test]
    async fn reviewed_flags_existing_pair_only() {
        let store = MemoryStore::new();
        let mut session = store.session().await.unwrap();
        let series_id = SeriesId::new();
        let author_id = AuthorId::from_uuid(uuid_for_author());

        let review = Review::new(ReviewId::new(), series_id, author_id, "text");
        ReviewRepository::create(&mut session, review).await.unwrap();

        assert!(matches!(
            session.reviewed(series_id, author_id).await,
            Err(Error::AlreadyReviewed)
        ));
        assert!(session.reviewed(SeriesId::new(), author_id).await.is_ok());
    }

    fn uuid_for_author() -> uuid::Uuid {
        uuid::Uuid::new_v4()
    }
}
