//! # fitcoach-types
//!
//! Shared domain types for the fitcoach assistant.
//!
//! This crate defines the core data structures used throughout the system:
//! - UserProfile: physiology, goals, injuries, equipment inventory
//! - Exercise / Workout: parsed workout plans
//! - Meal / NutritionPlan: parsed daily nutrition plans
//! - MacroTargets: calorie and macro targets derived from a profile
//! - Settings / ParserDefaults: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use fitcoach_types::{Difficulty, ParserDefaults};
//!
//! let defaults = ParserDefaults::default();
//! assert_eq!(defaults.difficulty, Difficulty::Intermediate);
//! ```

pub mod config;
pub mod error;
pub mod exercise;
pub mod meal;
pub mod profile;
pub mod targets;

pub use config::{ApiSettings, ParserDefaults, Settings, StorageSettings};
pub use error::FitcoachError;
pub use exercise::{Difficulty, Exercise, Workout};
pub use meal::{Meal, MealType, NutritionPlan};
pub use profile::{Gender, UserProfile};
pub use targets::MacroTargets;
