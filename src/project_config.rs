//! Best-effort reader for the Laravel `config/enumify.php` file.
//!
//! The file is PHP, so it is scanned with a handful of patterns instead of
//! being parsed. Each value is extracted independently and falls back to
//! its own default when its key cannot be found. Reading never fails.

use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Input directories used when the config does not list any.
pub const DEFAULT_ENUM_PATHS: &[&str] = &["app/Enums"];

/// Output directory used when the config does not name one.
pub const DEFAULT_OUTPUT_PATH: &str = "resources/js/enums";

/// Watch flag used when the config does not set `runtime.watch`.
pub const DEFAULT_WATCH: bool = true;

/// Values discovered in the project's enumify config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    /// Directories holding enum definitions (`paths.enums`).
    pub enum_paths: Vec<String>,
    /// Directory the generator writes into (`paths.output`).
    pub output_path: String,
    /// Whether dev mode should watch for changes (`runtime.watch`).
    pub watch: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            enum_paths: DEFAULT_ENUM_PATHS.iter().map(|p| p.to_string()).collect(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            watch: DEFAULT_WATCH,
        }
    }
}

impl ProjectConfig {
    /// Conventional location of the config under a project root.
    pub fn config_path(cwd: &Path) -> PathBuf {
        cwd.join("config").join("enumify.php")
    }

    /// Read the project config under `cwd`.
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn read(cwd: &Path) -> Self {
        let path = Self::config_path(cwd);

        if !path.exists() {
            crate::debug_event!("config", "no project config", "{}", path.display());
            return Self::default();
        }

        // PHP sources may carry stray non-UTF-8 bytes (Latin-1 comments);
        // they must not hide the values around them.
        match std::fs::read(&path) {
            Ok(bytes) => {
                crate::debug_event!("config", "read", "{}", path.display());
                Self::parse(&String::from_utf8_lossy(&bytes))
            }
            Err(e) => {
                tracing::debug!("[config] failed to read {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Extract the three values from raw config text.
    pub fn parse(contents: &str) -> Self {
        let defaults = Self::default();

        Self {
            enum_paths: extract_string_array(contents, "enums").unwrap_or(defaults.enum_paths),
            output_path: extract_string(contents, "output").unwrap_or(defaults.output_path),
            watch: extract_boolean(contents, "watch").unwrap_or(defaults.watch),
        }
    }
}

fn key_pattern(key: &str, value: &str) -> String {
    format!(r#"['"]{}['"]\s*=>\s*{value}"#, regex::escape(key))
}

/// `'key' => ['a', "b"]` yields the quoted items in order.
fn extract_string_array(contents: &str, key: &str) -> Option<Vec<String>> {
    let list = Regex::new(&key_pattern(key, r"\[([\s\S]*?)\]")).ok()?;
    let body = list.captures(contents)?.get(1)?.as_str();

    let item = Regex::new(r#"['"]([^'"]+)['"]"#).ok()?;
    let items: Vec<String> = item
        .captures_iter(body)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    if items.is_empty() { None } else { Some(items) }
}

/// `'key' => 'value'` yields `value`.
fn extract_string(contents: &str, key: &str) -> Option<String> {
    let re = Regex::new(&key_pattern(key, r#"['"]([^'"]+)['"]"#)).ok()?;
    re.captures(contents)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// `'key' => true` / `'key' => FALSE`, case-insensitive.
fn extract_boolean(contents: &str, key: &str) -> Option<bool> {
    let re = RegexBuilder::new(&key_pattern(key, "(true|false)"))
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .ok()?;
    let value = re.captures(contents)?.get(1)?.as_str();
    Some(value.eq_ignore_ascii_case("true"))
}
