//! Search error types.

use thiserror::Error;

/// Errors that can occur during index operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Index construction failed; no partial index exists
    #[error("index build failed: {0}")]
    IndexBuild(String),

    /// IO error reading or writing a persisted index
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
