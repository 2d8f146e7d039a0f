//! Invocation of the external enum generator.
//!
//! The generator is an opaque subprocess (`php artisan enumify:sync`). Only
//! its exit status matters; its stdio is inherited from this process.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use crate::config::ResolvedConfig;

/// Flags always passed after the sync command.
pub const SYNC_FLAGS: [&str; 2] = ["--force", "--quiet"];

/// A failed generator run.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Enumify sync failed with exit code {code}")]
    ExitCode { code: i32 },

    #[error("Enumify sync failed: terminated by signal")]
    Terminated,

    #[error("Enumify sync was interrupted before it finished")]
    Interrupted,

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that regenerates the enum bindings.
///
/// The controller only depends on this trait, so tests can substitute a
/// fake that never spawns a process.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation to completion.
    async fn generate(&self) -> Result<(), GenerateError>;
}

/// Runs `<artisan_bin> <artisan_file> <sync_command> --force --quiet`.
#[derive(Debug, Clone)]
pub struct ArtisanGenerator {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
    env: BTreeMap<String, String>,
}

impl ArtisanGenerator {
    pub fn new(config: &ResolvedConfig) -> Self {
        let mut args = vec![config.artisan_file.clone(), config.sync_command.clone()];
        args.extend(SYNC_FLAGS.iter().map(|flag| flag.to_string()));

        Self {
            program: config.artisan_bin.clone(),
            args,
            cwd: config.cwd.clone(),
            env: config.env.clone(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Build the command. The ambient environment is inherited and the
    /// configured variables override it.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.cwd)
            .envs(&self.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }
}

#[async_trait]
impl Generator for ArtisanGenerator {
    async fn generate(&self) -> Result<(), GenerateError> {
        crate::debug_event!(
            "generator",
            "spawn",
            "{} {} (in {})",
            self.program,
            self.args.join(" "),
            self.cwd.display()
        );

        let status = self
            .command()
            .status()
            .await
            .map_err(|source| GenerateError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(GenerateError::ExitCode { code }),
            None => Err(GenerateError::Terminated),
        }
    }
}
