//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::generator::{GenerateError, Generator};
use crate::host::{HostWatcher, Logger};

/// Let spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Generator that counts calls and returns scripted results.
///
/// A gated generator blocks each run until `release` is called, which
/// keeps a run "in progress" for as long as a test needs.
#[derive(Default)]
pub struct FakeGenerator {
    calls: AtomicUsize,
    gate: Option<Notify>,
    results: Mutex<VecDeque<Result<(), i32>>>,
}

impl FakeGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Notify::new()),
            ..Self::default()
        })
    }

    /// Queue an exit code for an upcoming run. Unscripted runs succeed.
    pub fn push_failure(&self, code: i32) {
        self.results.lock().push_back(Err(code));
    }

    pub fn push_success(&self) {
        self.results.lock().push_back(Ok(()));
    }

    /// Let the blocked run finish.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self) -> Result<(), GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.results.lock().pop_front();
        match next {
            Some(Err(code)) => Err(GenerateError::ExitCode { code }),
            _ => Ok(()),
        }
    }
}

/// Logger that keeps every message.
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLogger {
    fn level(&self, level: &str) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.level("info")
    }

    pub fn errors(&self) -> Vec<String> {
        self.level("error")
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.entries.lock().push(("info", message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.entries.lock().push(("warn", message.to_string()));
    }

    fn error(&self, message: &str) {
        self.entries.lock().push(("error", message.to_string()));
    }
}

/// Host watcher that records registered paths.
#[derive(Debug, Default)]
pub struct RecordingWatcher {
    pub added: Vec<PathBuf>,
}

impl HostWatcher for RecordingWatcher {
    fn add(&mut self, path: &Path) {
        self.added.push(path.to_path_buf());
    }
}
