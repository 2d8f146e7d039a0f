//! The enumify plugin: host hooks wired to the regeneration controller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{EnumifyOptions, Resolved, ResolvedConfig, resolve};
use crate::controller::{Controller, ERROR_PREFIX};
use crate::generator::{ArtisanGenerator, Generator};
use crate::host::{Enforce, HostWatcher, HotUpdate, Logger, Mode, Plugin, PluginError};
use crate::paths::{is_path_inside, to_absolute};
use crate::project_config::ProjectConfig;

/// Name the plugin registers under.
pub const PLUGIN_NAME: &str = "@devwizard/vite-plugin-enumify";

/// Create the plugin from explicit options.
///
/// Options are resolved immediately against the current directory and the
/// project's `config/enumify.php`.
pub fn enumify(options: EnumifyOptions) -> EnumifyPlugin {
    EnumifyPlugin::new(&options)
}

pub struct EnumifyPlugin {
    config: ResolvedConfig,
    project: ProjectConfig,
    /// Absolute input directories.
    enum_dirs: Vec<PathBuf>,
    /// Absolute output directory.
    output_dir: PathBuf,
    mode: Option<Mode>,
    controller: Controller,
}

impl EnumifyPlugin {
    pub fn new(options: &EnumifyOptions) -> Self {
        let resolved = resolve(options);
        let generator = Arc::new(ArtisanGenerator::new(&resolved.config));
        Self::with_generator(resolved, generator)
    }

    /// Build the plugin around any generator.
    pub fn with_generator(resolved: Resolved, generator: Arc<dyn Generator>) -> Self {
        Self::with_controller(resolved, Controller::new(generator))
    }

    pub fn with_controller(resolved: Resolved, controller: Controller) -> Self {
        let Resolved { config, project } = resolved;

        let enum_dirs = project
            .enum_paths
            .iter()
            .map(|p| to_absolute(&config.cwd, p))
            .collect();
        let output_dir = to_absolute(&config.cwd, &project.output_path);

        Self {
            config,
            project,
            enum_dirs,
            output_dir,
            mode: None,
            controller,
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn enum_dirs(&self) -> &[PathBuf] {
        &self.enum_dirs
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn watch_enabled(&self) -> bool {
        self.config.watch
    }

    /// Classify a changed file without acting on it.
    ///
    /// A relative `file` is taken as relative to the resolved project `cwd`,
    /// not the process working directory. The two only differ when an
    /// explicit `cwd` option is set and the host reports relative paths.
    pub fn classify(&self, file: &Path) -> HotUpdate {
        if !self.config.watch {
            return HotUpdate::WatchDisabled;
        }

        let file = to_absolute(&self.config.cwd, file);

        if is_path_inside(&file, &self.output_dir) {
            return HotUpdate::GeneratedOutput;
        }

        if self.enum_dirs.iter().any(|dir| is_path_inside(&file, dir)) {
            HotUpdate::Scheduled
        } else {
            HotUpdate::Unrelated
        }
    }
}

#[async_trait]
impl Plugin for EnumifyPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn enforce(&self) -> Option<Enforce> {
        Some(Enforce::Pre)
    }

    fn config_resolved(&mut self, mode: Mode, logger: Arc<dyn Logger>) {
        crate::debug_event!("enumify", "mode", "{mode}");
        self.mode = Some(mode);
        self.controller.set_logger(logger);
    }

    async fn build_start(&self) -> Result<(), PluginError> {
        if self.mode == Some(Mode::Serve) {
            if !self.controller.claim_initial_sync() {
                crate::debug_event!("enumify", "initial sync already done");
                return Ok(());
            }

            // Dev server keeps running; the failure is already logged.
            if let Err(e) = self.controller.run().await {
                crate::debug_event!("enumify", "initial sync failed", "{e}");
            }
            return Ok(());
        }

        self.controller.run().await.map(|_| ()).map_err(|e| {
            PluginError::new(PLUGIN_NAME, format!("{ERROR_PREFIX} {e}")).with_source(e)
        })
    }

    fn configure_server(&self, watcher: &mut dyn HostWatcher) {
        if !self.config.watch {
            return;
        }

        for dir in &self.enum_dirs {
            crate::debug_event!("enumify", "watch", "{}", dir.display());
            watcher.add(dir);
        }
    }

    fn handle_hot_update(&self, file: &Path) -> HotUpdate {
        let update = self.classify(file);
        if update == HotUpdate::Scheduled {
            crate::debug_event!("enumify", "changed", "{}", file.display());
            self.controller.schedule();
        }
        update
    }
}
