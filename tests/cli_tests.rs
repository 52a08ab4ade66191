//! Integration tests for project initialization and top-level CLI behavior

mod common;

use common::{plat, setup_test_project};
use predicates::prelude::*;

#[test]
fn test_init_creates_project_layout() {
    let tmp = tempfile::TempDir::new().unwrap();

    plat()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized plat project"));

    assert!(tmp.path().join(".plat").is_dir());
    assert!(tmp.path().join("deals").is_dir());
    assert!(tmp.path().join("financials/proformas").is_dir());
    assert!(tmp.path().join("tasks").is_dir());
    assert!(tmp.path().join("contacts").is_dir());
    assert!(tmp.path().join("timelines").is_dir());
}

#[test]
fn test_init_shows_getting_started_hints() {
    let tmp = tempfile::TempDir::new().unwrap();

    plat()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Next steps"))
        .stdout(predicate::str::contains("plat deal new"));
}

#[test]
fn test_init_quiet_suppresses_hints() {
    let tmp = tempfile::TempDir::new().unwrap();

    plat()
        .current_dir(tmp.path())
        .args(["init", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Next steps").not());
}

#[test]
fn test_init_twice_fails() {
    let tmp = setup_test_project();

    plat()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_init_explicit_path() {
    let tmp = tempfile::TempDir::new().unwrap();

    plat()
        .current_dir(tmp.path())
        .args(["init", "site-a"])
        .assert()
        .success();

    assert!(tmp.path().join("site-a/.plat").is_dir());
    assert!(tmp.path().join("site-a/deals").is_dir());
}

#[test]
fn test_commands_require_a_project() {
    let tmp = tempfile::TempDir::new().unwrap();

    plat()
        .current_dir(tmp.path())
        .args(["deal", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not inside a plat project"));
}

#[test]
fn test_discovery_walks_up_from_subdirectory() {
    let tmp = setup_test_project();

    plat()
        .current_dir(tmp.path().join("deals"))
        .args(["deal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No deals found."));
}

#[test]
fn test_help_lists_subcommands() {
    plat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deal"))
        .stdout(predicate::str::contains("task"))
        .stdout(predicate::str::contains("dash"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn test_version_flag() {
    plat()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("plat"));
}

#[test]
fn test_completions_generate_for_bash() {
    plat()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plat"));
}

#[test]
fn test_unknown_subcommand_fails() {
    plat().arg("frobnicate").assert().failure();
}
