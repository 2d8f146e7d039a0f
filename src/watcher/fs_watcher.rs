//! `notify`-backed implementation of the host watcher capability.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::host::HostWatcher;

use super::error::WatchError;

/// Recursive filesystem watcher that yields changed paths.
pub struct FsWatcher {
    /// Channel for receiving file events.
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    /// The underlying file watcher.
    watcher: notify::RecommendedWatcher,
    /// Directories registered so far.
    watched: BTreeSet<PathBuf>,
}

impl FsWatcher {
    pub fn new() -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel(100);

        let watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })?;

        Ok(Self {
            event_rx: rx,
            watcher,
            watched: BTreeSet::new(),
        })
    }

    /// Watch `dir` recursively.
    ///
    /// Registering the same directory twice is a no-op.
    pub fn watch(&mut self, dir: &Path) -> Result<(), WatchError> {
        if self.watched.contains(dir) {
            return Ok(());
        }

        self.watcher
            .watch(dir, RecursiveMode::Recursive)
            .map_err(|e| WatchError::PathWatchFailed {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;

        self.watched.insert(dir.to_path_buf());
        crate::log_event!("watcher", "watching", "{}", dir.display());
        Ok(())
    }

    pub fn watched(&self) -> impl Iterator<Item = &Path> {
        self.watched.iter().map(PathBuf::as_path)
    }

    /// Wait for the next batch of changed paths.
    ///
    /// Access events are skipped; watcher errors are logged and skipped.
    /// Returns `WatchError::ChannelClosed` once the watcher is gone.
    pub async fn next_changes(&mut self) -> Result<Vec<PathBuf>, WatchError> {
        loop {
            match self.event_rx.recv().await {
                Some(Ok(event)) => {
                    if is_change(&event.kind) && !event.paths.is_empty() {
                        return Ok(event.paths);
                    }
                    crate::debug_event!("watcher", "skipped", "{:?}", event.kind);
                }
                Some(Err(e)) => {
                    tracing::error!("[watcher] file watch error: {e}");
                }
                None => return Err(WatchError::ChannelClosed),
            }
        }
    }
}

impl HostWatcher for FsWatcher {
    fn add(&mut self, path: &Path) {
        // Missing directories are not fatal; the rest of the watch set still
        // works.
        if let Err(e) = self.watch(path) {
            tracing::warn!("[watcher] {e}");
        }
    }
}

/// Events that represent content changes (create, modify, remove).
fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}
