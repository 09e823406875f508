//! Embedding-based exercise similarity search.
//!
//! Indexes exercise descriptions as vectors and retrieves nearest
//! neighbors under equipment, difficulty, and injury constraints.
//! The index lives in memory and is rebuilt on demand; persistence
//! is plain JSON.

pub mod entry;
pub mod error;
pub mod index;
pub mod similarity;

pub use entry::{describe_exercise, EntryMetadata, ExerciseEmbedding};
pub use error::SearchError;
pub use index::{
    AlternativesResult, EquipmentFilter, EquipmentMatch, ExerciseIndex, SearchHit, SearchOptions,
};
pub use similarity::cosine_similarity;
