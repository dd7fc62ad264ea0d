//! Integration tests for srcpack-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use srcpack_core::test_utils::archive_entries;
use srcpack_core::test_utils::build_tree;
use std::fs;
use tempfile::TempDir;

fn srcpack_cmd() -> Command {
    cargo_bin_cmd!("srcpack")
}

#[test]
fn test_version_flag() {
    srcpack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("srcpack"));
}

#[test]
fn test_help_flag() {
    srcpack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line utility"));
}

#[test]
fn test_archive_help() {
    srcpack_cmd()
        .args(["archive", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--exclude"))
        .stdout(predicate::str::contains("--dedup"));
}

#[test]
fn test_archive_with_filters() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = build_tree(
        temp.path(),
        &["a.java", "b.txt", "sub/c.java", "target/d.java"],
    );
    let output = temp.path().join("out.zip");

    srcpack_cmd()
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .args(["-i", "java", "-x", "target"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive created"))
        .stdout(predicate::str::contains("Files archived:   2"));

    assert_eq!(archive_entries(&output), vec!["a.java", "sub/c.java"]);
}

#[test]
fn test_archive_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = build_tree(temp.path(), &["config.json", "nested/config.json"]);
    let output = temp.path().join("out.zip");

    let assert = srcpack_cmd()
        .arg("--json")
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .arg("--dedup")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(json["operation"], "archive");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["file_count"], 1);
    assert_eq!(json["data"]["duplicates_discarded"], 1);
}

#[test]
fn test_archive_nothing_selected_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = build_tree(temp.path(), &["a.java"]);
    let output = temp.path().join("out.zip");

    srcpack_cmd()
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .args(["-i", "*.cs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to archive"));

    assert!(!output.exists());
}

#[test]
fn test_archive_allow_empty() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = build_tree(temp.path(), &["a.java"]);
    let output = temp.path().join("out.zip");

    srcpack_cmd()
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .args(["-i", "*.cs", "--allow-empty"])
        .assert()
        .success();

    assert!(archive_entries(&output).is_empty());
}

#[test]
fn test_archive_extra_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = build_tree(temp.path(), &["package.json", "src/index.js"]);
    let extra = temp.path().join("fingerprints.json");
    fs::write(&extra, "{}").unwrap();
    let output = temp.path().join("out.zip");

    srcpack_cmd()
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .args(["--manifests", "package.json"])
        .arg("--extra-file")
        .arg(&extra)
        .assert()
        .success();

    assert_eq!(
        archive_entries(&output),
        vec!["fingerprints.json", "package.json"]
    );
}

#[test]
fn test_archive_refuses_existing_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = build_tree(temp.path(), &["a.txt"]);
    let output = temp.path().join("out.zip");
    fs::write(&output, "keep me").unwrap();

    srcpack_cmd()
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

    srcpack_cmd()
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .arg("--force")
        .assert()
        .success();

    assert_eq!(archive_entries(&output), vec!["a.txt"]);
}

#[test]
fn test_archive_missing_source() {
    let temp = TempDir::new().expect("failed to create temp dir");

    srcpack_cmd()
        .arg("archive")
        .arg(temp.path().join("missing"))
        .arg("-o")
        .arg(temp.path().join("out.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_manifests_without_include_is_config_error() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = build_tree(temp.path(), &["a.txt"]);

    srcpack_cmd()
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(temp.path().join("out.zip"))
        .args(["--manifests", "!*.lock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_list_command() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = build_tree(temp.path(), &["a.txt", "sub/b.txt"]);
    let output = temp.path().join("out.zip");

    srcpack_cmd()
        .arg("archive")
        .arg(&source)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    srcpack_cmd()
        .arg("list")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("sub/b.txt"));

    srcpack_cmd()
        .args(["list", "--long"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 2 files"));
}

#[test]
fn test_completion_command() {
    srcpack_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("srcpack"));
}
