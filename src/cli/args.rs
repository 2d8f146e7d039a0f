//! CLI argument parsing using clap.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{
    Args, Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};

use crate::config::EnumifyOptions;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

#[derive(Parser, Debug)]
#[command(name = "enumify")]
#[command(version)]
#[command(about = "Keep generated enum bindings in sync with their PHP definitions")]
#[command(styles = clap_cargo_style())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the generator once and exit non-zero on failure
    Build(GeneratorArgs),

    /// Run the generator, then regenerate whenever enum sources change
    Dev {
        #[command(flatten)]
        generator: GeneratorArgs,

        /// Watch even if runtime.watch is false in config/enumify.php
        #[arg(long, conflicts_with = "no_watch")]
        watch: bool,

        /// Do not watch, only run the initial sync
        #[arg(long)]
        no_watch: bool,
    },

    /// Show the resolved configuration
    Config(GeneratorArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GeneratorArgs {
    /// Project root containing artisan and config/enumify.php
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// PHP binary [default: php]
    #[arg(long = "bin", value_name = "PATH")]
    pub artisan_bin: Option<String>,

    /// Artisan entry file [default: artisan]
    #[arg(long = "artisan", value_name = "FILE")]
    pub artisan_file: Option<String>,

    /// Artisan command to run [default: enumify:sync]
    #[arg(long = "command", value_name = "NAME")]
    pub sync_command: Option<String>,

    /// Extra environment variable for the generator (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub env: Vec<(String, String)>,
}

impl GeneratorArgs {
    /// Layer these flags over options loaded from file and environment.
    pub fn apply(&self, options: &mut EnumifyOptions) {
        if let Some(cwd) = &self.cwd {
            options.cwd = Some(cwd.clone());
        }
        if let Some(bin) = &self.artisan_bin {
            options.artisan_bin = Some(bin.clone());
        }
        if let Some(file) = &self.artisan_file {
            options.artisan_file = Some(file.clone());
        }
        if let Some(command) = &self.sync_command {
            options.sync_command = Some(command.clone());
        }
        if !self.env.is_empty() {
            let env = options.env.get_or_insert_with(BTreeMap::new);
            env.extend(self.env.iter().cloned());
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
