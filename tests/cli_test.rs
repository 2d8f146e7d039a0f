//! End-to-end tests for the `enumify` binary.

#![cfg(unix)]

mod common;

use std::process::Command;

use common::Project;

fn enumify(project: &Project) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_enumify"));
    command.env_remove("RUST_LOG").current_dir(project.root());
    command
}

#[test]
fn test_config_command_shows_defaults() {
    let project = Project::new();

    let output = enumify(&project)
        .arg("config")
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(r#"artisan_bin = "php""#));
    assert!(stdout.contains(r#"sync_command = "enumify:sync""#));
    assert!(stdout.contains("app/Enums"));
    assert!(stdout.contains("resources/js/enums"));
    assert!(stdout.contains("watch = true"));
}

#[test]
fn test_config_command_reads_project_and_options_files() {
    let project = Project::new();
    project.write_config(
        "<?php return ['paths' => ['enums' => ['src/Enums', 'modules/Enums']], 'runtime' => ['watch' => false]];",
    );
    std::fs::write(
        project.root().join("enumify.toml"),
        "artisan_bin = \"php8.3\"\n",
    )
    .unwrap();

    let output = enumify(&project)
        .arg("config")
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(r#"artisan_bin = "php8.3""#));
    assert!(stdout.contains("src/Enums"));
    assert!(stdout.contains("modules/Enums"));
    assert!(stdout.contains("watch = false"));
}

#[test]
fn test_build_command_runs_generator() {
    let project = Project::new();

    let output = enumify(&project)
        .args(["build", "--bin", "sh", "--env", "ENUMIFY_TEST_VAR=cli"])
        .output()
        .expect("Failed to run build command");

    assert!(output.status.success());
    assert_eq!(project.run_count(), 1);
    assert_eq!(project.read("env_var.txt"), "cli");
}

#[test]
fn test_build_command_fails_with_generator() {
    let project = Project::new();

    let output = enumify(&project)
        .args(["build", "--bin", "sh", "--env", "ENUMIFY_TEST_EXIT=4"])
        .output()
        .expect("Failed to run build command");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Enumify sync failed with exit code 4"));
}

#[test]
fn test_dev_without_watch_runs_initial_sync_and_exits() {
    let project = Project::new();

    let output = enumify(&project)
        .args(["dev", "--bin", "sh", "--no-watch"])
        .output()
        .expect("Failed to run dev command");

    assert!(output.status.success());
    assert_eq!(project.run_count(), 1);
}
