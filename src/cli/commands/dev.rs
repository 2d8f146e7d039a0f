//! Dev command - initial sync followed by watch-triggered regeneration.

use std::sync::Arc;

use anyhow::Context;

use crate::config::EnumifyOptions;
use crate::host::{HotUpdate, Mode, Plugin, TracingLogger};
use crate::plugin::enumify;
use crate::watcher::FsWatcher;

/// Run until Ctrl-C.
///
/// With watching disabled this only performs the initial sync.
pub async fn run(options: EnumifyOptions) -> anyhow::Result<()> {
    let mut plugin = enumify(options);
    plugin.config_resolved(Mode::Serve, Arc::new(TracingLogger));

    // Initial sync; failures are logged and do not stop the session.
    plugin.build_start().await?;

    if !plugin.watch_enabled() {
        crate::log_event!("enumify", "watch disabled", "initial sync only");
        return Ok(());
    }

    let mut watcher = FsWatcher::new().context("failed to start file watcher")?;
    plugin.configure_server(&mut watcher);

    let watched = watcher.watched().count();
    if watched == 0 {
        tracing::warn!("[enumify] none of the enum directories could be watched");
    }
    crate::log_event!(
        "enumify",
        "ready",
        "watching {watched} directories, press Ctrl-C to stop"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                crate::log_event!("enumify", "stopping");
                break;
            }

            changes = watcher.next_changes() => {
                for path in changes? {
                    let update = plugin.handle_hot_update(&path);
                    if update != HotUpdate::Scheduled {
                        crate::debug_event!("enumify", "ignored", "{update:?} {}", path.display());
                    }
                }
            }
        }
    }

    Ok(())
}
