//! Command-line host for the enumify plugin.
//!
//! Provides argument parsing and the `build`, `dev` and `config` commands.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, GeneratorArgs};
