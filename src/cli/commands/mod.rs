//! Command implementations.

pub mod build;
pub mod config;
pub mod dev;

use crate::config::{OptionsError, Settings};
use crate::paths::to_absolute;

use super::GeneratorArgs;

/// Load `enumify.toml` and `ENUMIFY_*` variables from the project
/// directory, then apply command-line flags on top.
pub fn load_settings(args: &GeneratorArgs) -> Result<Settings, OptionsError> {
    let current = std::env::current_dir()?;
    let project_dir = match &args.cwd {
        Some(cwd) => to_absolute(&current, cwd),
        None => current,
    };

    let mut settings = Settings::load_from(&project_dir)?;
    args.apply(&mut settings.options);
    Ok(settings)
}
