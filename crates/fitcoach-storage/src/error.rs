//! Storage error types.

use thiserror::Error;

/// Errors that can occur while persisting state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error writing the state file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// State serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
