//! Keeps generated enum bindings in sync with their PHP definitions.
//!
//! The [`EnumifyPlugin`] runs the external generator (`php artisan
//! enumify:sync`) when a build starts and, in dev mode, whenever a file in
//! one of the enum directories changes. Runs never overlap, bursts of
//! changes are debounced, and writes into the output directory never
//! trigger another run.

pub mod cli;
pub mod config;
pub mod controller;
pub mod generator;
pub mod host;
pub mod logging;
pub mod paths;
pub mod plugin;
pub mod project_config;
pub mod watcher;

#[cfg(test)]
mod testing;

pub use config::{EnumifyOptions, Resolved, ResolvedConfig, Settings, resolve, resolve_in};
pub use controller::{Controller, RunOutcome, RunState};
pub use generator::{ArtisanGenerator, GenerateError, Generator};
pub use host::{Enforce, HostWatcher, HotUpdate, Logger, Mode, Plugin, PluginError, TracingLogger};
pub use plugin::{EnumifyPlugin, PLUGIN_NAME, enumify};
pub use project_config::ProjectConfig;
