//! Tooling & Integration Layer
//!
//! Command-line front end standing in for the dashboard's presentation layer:
//! it reads snapshots, filtered views and stats from the store and emits
//! intents through the dispatcher.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, DraftArgs};
