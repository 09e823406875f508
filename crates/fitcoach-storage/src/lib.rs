//! Local JSON persistence for profiles and plan history.
//!
//! A single state document holds the user profile plus a bounded,
//! most-recent-first history of workout and meal-plan summaries.
//! Bad state on disk is never fatal; it reads as empty.

pub mod error;
pub mod store;
pub mod summary;

pub use error::StorageError;
pub use store::{History, Storage};
pub use summary::{MealPlanSummary, WorkoutSummary};
