//! Indexing sink trait and error types

use crate::page::Page;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while indexing a crawl
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Namespace cannot be empty")]
    EmptyNamespace,
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Reference to an indexed crawl, handed to downstream query front ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHandle {
    /// Namespace the pages were stored under
    pub namespace: String,

    /// Number of pages stored
    pub page_count: usize,

    /// Where the index lives (a path, URI, or other backend locator)
    pub location: String,
}

/// Downstream consumer of a finished crawl
///
/// Invoked exactly once per crawl with the full ordered result set, which
/// may be empty. Whether an empty index is an error is the sink's call.
#[async_trait]
pub trait IndexingSink: Send + Sync {
    async fn index(&self, pages: &[Page], namespace: &str) -> SinkResult<IndexHandle>;
}
