//! Capability interface between a build host and its plugins.
//!
//! The host owns the logger and the file watcher and hands references to
//! the plugin through lifecycle hooks. Plugins implement [`Plugin`]; the
//! `enumify` binary is one such host, and tests drive plugins directly
//! through the same trait.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// How the host is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One-shot production build.
    Build,
    /// Long-running dev server with file watching.
    Serve,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Build => write!(f, "build"),
            Mode::Serve => write!(f, "serve"),
        }
    }
}

/// Plugin ordering relative to the host's own transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforce {
    Pre,
    Post,
}

/// Host logging channel.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Logger that forwards to `tracing`. Used until the host provides one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Host file watcher. Registering a path extends the host's watch scope.
pub trait HostWatcher {
    fn add(&mut self, path: &Path);
}

/// Fatal error reported to the host, aborting a build.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct PluginError {
    pub plugin: String,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PluginError {
    pub fn new(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

/// What a plugin did with a file-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotUpdate {
    /// A regeneration was scheduled.
    Scheduled,
    /// Watching is disabled.
    WatchDisabled,
    /// The file is generated output.
    GeneratedOutput,
    /// The file is outside every watched directory.
    Unrelated,
}

/// Lifecycle hooks a host calls on its plugins.
///
/// Call order: `config_resolved`, then `build_start`, then (dev server
/// only) `configure_server` followed by any number of `handle_hot_update`.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn enforce(&self) -> Option<Enforce> {
        None
    }

    /// The host configuration is final.
    fn config_resolved(&mut self, mode: Mode, logger: Arc<dyn Logger>);

    /// A build (or the dev server's first pass) is starting.
    async fn build_start(&self) -> Result<(), PluginError>;

    /// The dev server is up; register extra watch paths.
    fn configure_server(&self, watcher: &mut dyn HostWatcher);

    /// A watched file changed. Must be called from within a tokio runtime.
    fn handle_hot_update(&self, file: &Path) -> HotUpdate;
}
