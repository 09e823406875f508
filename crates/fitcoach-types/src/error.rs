//! Error types shared across the fitcoach system.

use thiserror::Error;

/// Unified error type for cross-cutting fitcoach operations.
#[derive(Debug, Error)]
pub enum FitcoachError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
