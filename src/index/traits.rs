//! Index sink trait and error types
//!
//! An index sink is the destination of a finished crawl: it owns the search
//! collection's schema and receives documents in batches.

use crate::extract::Document;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while talking to the search index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Index returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Index configuration error: {0}")]
    Config(String),
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Destination for crawled documents
#[async_trait]
pub trait IndexSink: Send + Sync {
    /// Creates the collection if it does not exist
    ///
    /// Calling this on an existing collection is not an error.
    async fn ensure_schema(&self) -> IndexResult<()>;

    /// Inserts or overwrites documents keyed by `id`
    ///
    /// An empty batch is a no-op.
    ///
    /// # Returns
    ///
    /// The number of documents the index accepted
    async fn upsert_batch(&self, documents: &[Document]) -> IndexResult<usize>;

    /// Drops the collection, if any, and creates it again empty
    async fn reset(&self) -> IndexResult<()>;
}
