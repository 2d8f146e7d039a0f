//! Config command - print the resolved configuration as TOML.

use serde::Serialize;

use crate::config::{EnumifyOptions, ResolvedConfig};
use crate::plugin::enumify;
use crate::project_config::ProjectConfig;

#[derive(Serialize)]
struct ConfigReport<'a> {
    output_dir: String,
    enum_dirs: Vec<String>,
    resolved: &'a ResolvedConfig,
    project: &'a ProjectConfig,
}

pub fn run(options: EnumifyOptions) -> anyhow::Result<()> {
    let plugin = enumify(options);

    let report = ConfigReport {
        output_dir: plugin.output_dir().display().to_string(),
        enum_dirs: plugin
            .enum_dirs()
            .iter()
            .map(|dir| dir.display().to_string())
            .collect(),
        resolved: plugin.config(),
        project: plugin.project(),
    };

    println!("{}", toml::to_string_pretty(&report)?);
    Ok(())
}
