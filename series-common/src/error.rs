/// Errors produced by the repositories and interactors.
///
/// The two domain variants are matched on by the HTTP layer; everything else
/// is treated as opaque.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("series not found")]
    SeriesNotFound,

    #[error("this author already reviewed this series")]
    AlreadyReviewed,

    #[error("operation timed out")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }

    /// Whether this is one of the business rule failures rather than an
    /// infrastructure fault.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::SeriesNotFound | Self::AlreadyReviewed)
    }
}
