//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::TempDir;

use enumify_watch::Logger;

/// Fake artisan entry file, run through `sh` in place of `php`. Records its
/// arguments, working directory and a few environment variables, appends to
/// `runs.log`, writes one generated file and exits with
/// `$ENUMIFY_TEST_EXIT` (default 0).
const FAKE_ARTISAN: &str = r#"#!/bin/sh
printf '%s\n' "$0" "$@" > args.txt
pwd -P > cwd.txt
printf '%s' "$ENUMIFY_TEST_VAR" > env_var.txt
printf '%s' "$HOME" > env_home.txt
printf '%s' "$PATH" > env_path.txt
echo run >> runs.log
mkdir -p resources/js/enums
echo "export enum Status {}" > resources/js/enums/Status.ts
exit "${ENUMIFY_TEST_EXIT:-0}"
"#;

pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app/Enums")).unwrap();

        fs::write(dir.path().join("artisan"), FAKE_ARTISAN).unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin/console"), FAKE_ARTISAN).unwrap();

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_config(&self, contents: &str) {
        fs::create_dir_all(self.root().join("config")).unwrap();
        fs::write(self.root().join("config/enumify.php"), contents).unwrap();
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.root().join(name)).unwrap_or_default()
    }

    pub fn recorded_args(&self) -> Vec<String> {
        self.read("args.txt").lines().map(str::to_string).collect()
    }

    pub fn run_count(&self) -> usize {
        self.read("runs.log").lines().count()
    }

    pub fn canonical_root(&self) -> PathBuf {
        self.root().canonicalize().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }

    fn warn(&self, _message: &str) {}

    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }
}
