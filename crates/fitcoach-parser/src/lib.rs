//! Defensive parsing of generative model replies into fitcoach records.
//!
//! Model output is treated as untrusted: a reply may arrive as prose
//! around a fenced JSON block, with numbers encoded as strings, enum
//! values in arbitrary casing, or whole fields missing. The parsers
//! here decode what they can and fall back to configured defaults for
//! the rest. Only a payload that cannot be decoded as a JSON object at
//! all is an error.

pub mod error;
mod fields;
pub mod nutrition;
pub mod payload;
pub mod workout;

pub use error::ParseError;
pub use nutrition::NutritionParser;
pub use payload::RawPayload;
pub use workout::WorkoutParser;
