//! Configuration for the enumify integration.
//!
//! Two layers feed the resolved configuration:
//! - `EnumifyOptions`: explicit options handed to the plugin. The CLI
//!   builds them from `enumify.toml`, `ENUMIFY_*` environment variables and
//!   command-line flags (in increasing precedence).
//! - `ProjectConfig`: values scraped from the Laravel `config/enumify.php`.
//!
//! `resolve` merges both with hard defaults. Precedence, highest first:
//! explicit option, project config, default.
//!
//! # Environment Variables
//!
//! - `ENUMIFY_ARTISAN_BIN=/usr/bin/php8.3` sets `artisan_bin`
//! - `ENUMIFY_WATCH=false` sets `watch`
//!
//! Generator environment overrides (`env`) can only come from the TOML file
//! or `--env` flags.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::project_config::ProjectConfig;

/// Name of the optional options file in the working directory.
pub const OPTIONS_FILE: &str = "enumify.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "ENUMIFY_";

pub const DEFAULT_ARTISAN_BIN: &str = "php";
pub const DEFAULT_ARTISAN_FILE: &str = "artisan";
pub const DEFAULT_SYNC_COMMAND: &str = "enumify:sync";

/// Errors from loading the options layer.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Invalid enumify options: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("Cannot determine working directory: {0}")]
    WorkingDirectory(#[from] std::io::Error),
}

/// Explicit plugin options. Every field is optional and defaulted
/// independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnumifyOptions {
    /// PHP binary used to run artisan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artisan_bin: Option<String>,

    /// Path to the artisan entry file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artisan_file: Option<String>,

    /// Artisan command that regenerates the enums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_command: Option<String>,

    /// Working directory for the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    /// Watch override. When unset, `runtime.watch` from the project
    /// config decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch: Option<bool>,

    /// Extra environment variables for the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

/// Logging section of `enumify.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default level for all targets.
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `enumify_watch::controller = "debug"`.
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: BTreeMap::new(),
        }
    }
}

/// Everything `enumify.toml` can hold.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(flatten)]
    pub options: EnumifyOptions,
}

impl Settings {
    /// Load settings from `dir/enumify.toml` and `ENUMIFY_*` variables.
    ///
    /// A missing file is not an error.
    pub fn load_from(dir: &Path) -> Result<Self, OptionsError> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join(OPTIONS_FILE)))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["env", "logging"]))
            .extract()
            .map_err(|e| OptionsError::Invalid(Box::new(e)))
    }
}

/// Fully resolved configuration, fixed for the plugin's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub artisan_bin: String,
    pub artisan_file: String,
    pub sync_command: String,
    /// Absolute working directory.
    pub cwd: PathBuf,
    pub watch: bool,
    pub env: BTreeMap<String, String>,
}

/// Result of resolution: the plugin configuration plus the project config
/// it was derived from (needed for the watched directories).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub config: ResolvedConfig,
    pub project: ProjectConfig,
}

/// Resolve options against the process working directory.
pub fn resolve(options: &EnumifyOptions) -> Resolved {
    let working_dir = working_dir_or_root(std::env::current_dir());
    resolve_in(options, &working_dir)
}

/// The working directory must stay absolute even when the process cannot
/// report it (e.g. it was deleted); fall back to the filesystem root.
fn working_dir_or_root(current: std::io::Result<PathBuf>) -> PathBuf {
    current.unwrap_or_else(|e| {
        tracing::debug!("[config] current directory unavailable, using filesystem root: {e}");
        PathBuf::from(std::path::MAIN_SEPARATOR_STR)
    })
}

/// Resolve options, using `working_dir` when `options.cwd` is unset and as
/// the base for a relative `options.cwd`.
pub fn resolve_in(options: &EnumifyOptions, working_dir: &Path) -> Resolved {
    let cwd = match &options.cwd {
        Some(cwd) => crate::paths::to_absolute(working_dir, cwd),
        None => crate::paths::normalize(working_dir),
    };
    let project = ProjectConfig::read(&cwd);

    let config = ResolvedConfig {
        artisan_bin: options
            .artisan_bin
            .clone()
            .unwrap_or_else(|| DEFAULT_ARTISAN_BIN.to_string()),
        artisan_file: options
            .artisan_file
            .clone()
            .unwrap_or_else(|| DEFAULT_ARTISAN_FILE.to_string()),
        sync_command: options
            .sync_command
            .clone()
            .unwrap_or_else(|| DEFAULT_SYNC_COMMAND.to_string()),
        watch: options.watch.unwrap_or(project.watch),
        env: options.env.clone().unwrap_or_default(),
        cwd,
    };

    Resolved { config, project }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_project_config(dir: &Path, contents: &str) {
        fs::create_dir_all(dir.join("config")).unwrap();
        fs::write(dir.join("config").join("enumify.php"), contents).unwrap();
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let resolved = resolve_in(&EnumifyOptions::default(), temp_dir.path());

        assert_eq!(resolved.config.artisan_bin, "php");
        assert_eq!(resolved.config.artisan_file, "artisan");
        assert_eq!(resolved.config.sync_command, "enumify:sync");
        assert_eq!(resolved.config.cwd, temp_dir.path());
        assert!(resolved.config.watch);
        assert!(resolved.config.env.is_empty());
        assert_eq!(resolved.project, ProjectConfig::default());
    }

    #[test]
    fn test_explicit_options_win() {
        let temp_dir = TempDir::new().unwrap();
        write_project_config(temp_dir.path(), "'watch' => true");

        let options = EnumifyOptions {
            artisan_bin: Some("/usr/bin/php8.3".to_string()),
            artisan_file: Some("bin/artisan".to_string()),
            sync_command: Some("enums:generate".to_string()),
            cwd: None,
            watch: Some(false),
            env: Some(BTreeMap::from([("APP_ENV".to_string(), "local".to_string())])),
        };
        let resolved = resolve_in(&options, temp_dir.path());

        assert_eq!(resolved.config.artisan_bin, "/usr/bin/php8.3");
        assert_eq!(resolved.config.artisan_file, "bin/artisan");
        assert_eq!(resolved.config.sync_command, "enums:generate");
        assert!(!resolved.config.watch);
        assert_eq!(resolved.config.env["APP_ENV"], "local");
    }

    #[test]
    fn test_watch_falls_back_to_project_config() {
        let temp_dir = TempDir::new().unwrap();
        write_project_config(temp_dir.path(), "'runtime' => ['watch' => false]");

        let resolved = resolve_in(&EnumifyOptions::default(), temp_dir.path());
        assert!(!resolved.config.watch);
    }

    #[test]
    fn test_relative_cwd_is_resolved_against_working_dir() {
        let temp_dir = TempDir::new().unwrap();
        let options = EnumifyOptions {
            cwd: Some(PathBuf::from("apps/./web")),
            ..Default::default()
        };
        let resolved = resolve_in(&options, temp_dir.path());
        assert_eq!(resolved.config.cwd, temp_dir.path().join("apps/web"));
    }

    #[test]
    fn test_unavailable_working_dir_falls_back_to_root() {
        let missing = Err(std::io::Error::from(std::io::ErrorKind::NotFound));
        let working_dir = working_dir_or_root(missing);
        assert_eq!(working_dir, PathBuf::from(std::path::MAIN_SEPARATOR_STR));

        let current = PathBuf::from(std::path::MAIN_SEPARATOR_STR).join("srv").join("app");
        assert_eq!(working_dir_or_root(Ok(current.clone())), current);
    }

    #[test]
    fn test_project_config_is_read_from_resolved_cwd() {
        let temp_dir = TempDir::new().unwrap();
        let app = temp_dir.path().join("app");
        write_project_config(&app, "'output' => 'public/enums'");

        let options = EnumifyOptions {
            cwd: Some(PathBuf::from("app")),
            ..Default::default()
        };
        let resolved = resolve_in(&options, temp_dir.path());
        assert_eq!(resolved.project.output_path, "public/enums");
    }

    #[test]
    fn test_load_settings_from_toml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                OPTIONS_FILE,
                r#"
artisan_bin = "php8.2"
watch = true

[env]
APP_ENV = "testing"

[logging]
default = "debug"
"#,
            )?;
            jail.set_env("ENUMIFY_ARTISAN_BIN", "php8.3");
            jail.set_env("ENUMIFY_WATCH", "false");

            let settings = Settings::load_from(jail.directory()).expect("settings load");
            assert_eq!(settings.options.artisan_bin.as_deref(), Some("php8.3"));
            assert_eq!(settings.options.watch, Some(false));
            assert_eq!(
                settings.options.env.as_ref().map(|env| env["APP_ENV"].as_str()),
                Some("testing")
            );
            assert_eq!(settings.logging.default, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_load_settings_without_file() {
        figment::Jail::expect_with(|jail| {
            let settings = Settings::load_from(jail.directory()).expect("settings load");
            assert_eq!(settings.options, EnumifyOptions::default());
            assert_eq!(settings.logging, LoggingConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_settings_rejects_wrong_types() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(OPTIONS_FILE, "watch = \"sometimes\"")?;
            assert!(Settings::load_from(jail.directory()).is_err());
            Ok(())
        });
    }
}
