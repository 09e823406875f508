//! Fitcoach CLI library.
//!
//! The binary in `main.rs` is a thin wrapper; argument definitions and
//! command handlers live here so integration tests can drive them
//! directly.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, GenerateCommands, IndexCommands, ParseCommands, ProfileCommands};
pub use commands::run;
