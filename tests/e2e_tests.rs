//! End-to-end tests for the modup CLI
//!
//! These tests verify:
//! - Exit codes and messages for input errors
//! - Runs that need no version query leave go.mod unchanged
//! - Query failures abort the run with the failing module named
//!
//! None of them need network access or a Go toolchain.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// go.mod whose direct requirements are all replaced by local directories
const LOCAL_ONLY_GO_MOD: &str = r#"module example.com/app

go 1.22

require (
	example.com/lib v0.0.0-00010101000000-000000000000
	golang.org/x/sys v0.15.0 // indirect
)

replace example.com/lib => ./lib
"#;

fn create_module(go_mod: &str) -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    fs::write(temp_dir.path().join("go.mod"), go_mod).unwrap();
    temp_dir
}

fn modup() -> Command {
    let mut cmd = Command::cargo_bin("modup").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("GOPROXY");
    cmd
}

#[test]
fn test_version_flag() {
    modup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(concat!(
            "modup ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_missing_go_mod_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    modup()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: reading go.mod"));
}

#[test]
fn test_malformed_go_mod_fails() {
    let temp_dir = create_module("module example.com/app\n\nrequire (\n\texample.com/a v1.0.0\n");

    modup()
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn test_local_and_indirect_only_is_nothing_to_upgrade() {
    let temp_dir = create_module(LOCAL_ONLY_GO_MOD);

    modup()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("All direct modules are up to date."))
        .stderr(predicate::str::contains(
            "example.com/lib is replaced by a local directory",
        ));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("go.mod")).unwrap(),
        LOCAL_ONLY_GO_MOD
    );
}

#[test]
fn test_json_output() {
    let temp_dir = create_module(LOCAL_ONLY_GO_MOD);

    let output = modup()
        .args(["--json", "--dry-run"])
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["outcome"], "nothing_to_upgrade");
    assert_eq!(value["dry_run"], true);
}

#[test]
fn test_quiet_output() {
    let temp_dir = create_module(LOCAL_ONLY_GO_MOD);

    modup()
        .arg("-q")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout("No updates\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_missing_go_binary_fails_resolution() {
    let temp_dir = create_module("module example.com/app\n\nrequire example.com/a v1.0.0\n");
    let empty_path = tempfile::tempdir().unwrap();

    modup()
        .env("PATH", empty_path.path())
        .args(["--retries", "2", "--retry-delay", "1"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("resolving example.com/a"))
        .stderr(predicate::str::contains("go list -m -u -json example.com/a"));
}

#[test]
fn test_invalid_age_is_usage_error() {
    modup()
        .args(["--age", "soon"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid duration format"));
}
