//! Parser error type.

use thiserror::Error;

/// Raised when a payload cannot be decoded as structured data at all.
///
/// Field-level problems never surface here; they are absorbed by
/// defaulting. Both variants carry the offending payload so callers
/// can log what the model actually sent.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The payload string was not valid JSON.
    #[error("payload is not valid JSON: {reason}")]
    InvalidJson {
        /// Decoder message
        reason: String,
        /// The raw payload as received
        payload: String,
    },

    /// The payload decoded to something other than a JSON object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON type of what actually arrived
        found: &'static str,
        /// The raw payload as received
        payload: String,
    },
}
