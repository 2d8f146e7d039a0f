//! Filesystem watcher backing the `enumify dev` host.
//!
//! A single `notify::RecommendedWatcher` feeds change events into a tokio
//! channel. Directories are registered through the [`HostWatcher`]
//! capability, so the plugin decides what is watched and the host only
//! forwards changed paths back to it.
//!
//! [`HostWatcher`]: crate::host::HostWatcher

mod error;
mod fs_watcher;

pub use error::WatchError;
pub use fs_watcher::FsWatcher;
