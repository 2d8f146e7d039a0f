//! Diagnostics output for the `enumify` binary.
//!
//! Lines go to stderr as `HH:MM:SS.mmm LEVEL [component] event: detail`,
//! leaving stdout to command output such as `enumify config`.
//!
//! Levels come from the `[logging]` table of `enumify.toml`:
//!
//! ```toml
//! [logging]
//! default = "info"
//!
//! [logging.modules]
//! enumify_watch = "debug"
//! ```
//!
//! `--verbose` raises the default level to `debug`. A valid `RUST_LOG`
//! replaces both:
//!
//! ```bash
//! RUST_LOG=enumify_watch::controller=trace enumify dev
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use crate::config::LoggingConfig;

/// Default level selected by `--verbose`.
const VERBOSE_LEVEL: &str = "debug";

/// Level used when the configured directives do not parse.
const FALLBACK_LEVEL: &str = "info";

/// HH:MM:SS.mmm in local time.
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Directive string for the configured levels, e.g. `info,notify=error`.
fn directives(config: &LoggingConfig, verbose: bool) -> String {
    let default = if verbose {
        VERBOSE_LEVEL
    } else {
        config.default.as_str()
    };

    std::iter::once(default.to_string())
        .chain(
            config
                .modules
                .iter()
                .map(|(target, level)| format!("{target}={level}")),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Choose the active filter: `RUST_LOG`, then the configured levels, then
/// `info`. Rejected directives are reported back so they can be logged
/// once the subscriber is installed.
fn build_filter(
    config: &LoggingConfig,
    verbose: bool,
    rust_log: Option<&str>,
) -> (EnvFilter, Option<String>) {
    let mut rejected = None;

    if let Some(spec) = rust_log {
        match EnvFilter::try_new(spec) {
            Ok(filter) => return (filter, None),
            Err(e) => rejected = Some(format!("ignoring RUST_LOG `{spec}`: {e}")),
        }
    }

    let configured = directives(config, verbose);
    match EnvFilter::try_new(&configured) {
        Ok(filter) => (filter, rejected),
        Err(e) => (
            EnvFilter::new(FALLBACK_LEVEL),
            Some(format!(
                "ignoring [logging] levels `{configured}`: {e}; using {FALLBACK_LEVEL}"
            )),
        ),
    }
}

/// Install the global subscriber. Calls after the first are ignored.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let (filter, rejected) = build_filter(config, verbose, rust_log.as_deref());

    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(CompactTime)
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if let (true, Some(message)) = (installed, rejected) {
        tracing::warn!("[logging] {message}");
    }
}

/// Shared body of [`log_event!`] and [`debug_event!`].
#[doc(hidden)]
#[macro_export]
macro_rules! component_event {
    ($level:ident, $component:expr, $event:expr) => {
        tracing::$level!("[{}] {}", $component, $event)
    };
    ($level:ident, $component:expr, $event:expr, $($arg:tt)*) => {
        tracing::$level!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// `[component] event: detail` at info level.
///
/// ```ignore
/// log_event!("watcher", "watching", "{}", dir.display());
/// ```
#[macro_export]
macro_rules! log_event {
    ($($args:tt)*) => {
        $crate::component_event!(info, $($args)*)
    };
}

/// `[component] event: detail` at debug level.
#[macro_export]
macro_rules! debug_event {
    ($($args:tt)*) => {
        $crate::component_event!(debug, $($args)*)
    };
}
