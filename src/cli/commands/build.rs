//! Build command - one-shot generation.

use std::sync::Arc;

use crate::config::EnumifyOptions;
use crate::host::{Mode, Plugin, TracingLogger};
use crate::plugin::enumify;

/// Run the generator once. A generator failure is returned as an error.
pub async fn run(options: EnumifyOptions) -> anyhow::Result<()> {
    let mut plugin = enumify(options);
    plugin.config_resolved(Mode::Build, Arc::new(TracingLogger));

    crate::debug_event!("build", "cwd", "{}", plugin.config().cwd.display());

    plugin.build_start().await?;
    Ok(())
}
