//! Binary-level tests: exit status and output of the installed command

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn initplan() -> Command {
    let mut cmd = Command::cargo_bin("initplan").unwrap();
    cmd.env_remove("RUST_LOG").env("INITPLAN_COLOR", "never");
    cmd
}

fn manifest(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("init.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn plan_prints_modules_in_order() {
    let dir = TempDir::new().unwrap();
    let path = manifest(
        &dir,
        "[modules.http]\nrequires = [\"db\"]\n[modules.db]\n[modules.audit]\nprecede = [\"db\"]\n",
    );

    initplan()
        .arg("plan")
        .arg(&path)
        .assert()
        .success()
        .stdout("  1. audit\n  2. db\n  3. http\n");
}

#[test]
fn check_cycle_fails_with_message() {
    let dir = TempDir::new().unwrap();
    let path = manifest(
        &dir,
        "[modules.a]\nrequires = [\"b\"]\n[modules.b]\nrequires = [\"a\"]\n",
    );

    initplan()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency cycle between"));
}

#[test]
fn run_unknown_dependency_fails() {
    let dir = TempDir::new().unwrap();
    let path = manifest(&dir, "[modules.a]\nrequires = [\"ghost\"]\n");

    initplan()
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("module 'ghost' was never registered"));
}

#[test]
fn no_command_prints_banner() {
    initplan()
        .assert()
        .success()
        .stdout(predicate::str::contains("initplan --help"));
}

#[test]
fn invalid_log_level_is_rejected() {
    initplan()
        .args(["--log-level", "9", "check", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}
