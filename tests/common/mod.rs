//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a plat command
pub fn plat() -> Command {
    Command::new(cargo::cargo_bin!("plat"))
}

/// Helper to create a test project in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    plat()
        .current_dir(tmp.path())
        .args(["init", "--quiet"])
        .assert()
        .success();
    tmp
}

/// Run a `new` subcommand with `--format id` and capture the minted ID
fn create_entity(tmp: &TempDir, args: &[&str]) -> String {
    let output = plat()
        .current_dir(tmp.path())
        .args(args)
        .args(["--no-edit", "--format", "id"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "entity creation failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Helper to create a test deal, returning its full ID
pub fn create_deal(tmp: &TempDir, title: &str) -> String {
    create_entity(tmp, &["deal", "new", "--title", title])
}

/// Helper to create a deal with extra `new` flags
pub fn create_deal_with(tmp: &TempDir, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["deal", "new", "--title", title];
    args.extend_from_slice(extra);
    create_entity(tmp, &args)
}

/// Helper to create a test task
pub fn create_task(tmp: &TempDir, title: &str) -> String {
    create_entity(tmp, &["task", "new", "--title", title])
}

/// Helper to create a task with extra `new` flags
pub fn create_task_with(tmp: &TempDir, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["task", "new", "--title", title];
    args.extend_from_slice(extra);
    create_entity(tmp, &args)
}

/// Helper to create a test contact
pub fn create_contact(tmp: &TempDir, name: &str) -> String {
    create_entity(tmp, &["contact", "new", "--name", name])
}

/// Helper to create a contact with extra `new` flags
pub fn create_contact_with(tmp: &TempDir, name: &str, extra: &[&str]) -> String {
    let mut args = vec!["contact", "new", "--name", name];
    args.extend_from_slice(extra);
    create_entity(tmp, &args)
}

/// Helper to create a test timeline
pub fn create_timeline(tmp: &TempDir, title: &str) -> String {
    create_entity(tmp, &["timeline", "new", "--title", title])
}

/// Helper to create a timeline attached to a deal
pub fn create_timeline_for(tmp: &TempDir, title: &str, deal: &str) -> String {
    create_entity(tmp, &["timeline", "new", "--title", title, "--deal", deal])
}

/// Helper to create a bare proforma for a deal
pub fn create_proforma(tmp: &TempDir, title: &str, deal: &str) -> String {
    create_entity(tmp, &["pro", "new", "--title", title, "--deal", deal])
}

/// The canonical worked example: 10 units at $100k out / $50k in on $200k
/// land prices out to $235,000 profit under the default assumptions.
pub fn create_reference_proforma(tmp: &TempDir, title: &str, deal: &str) -> String {
    create_entity(
        tmp,
        &[
            "pro",
            "new",
            "--title",
            title,
            "--deal",
            deal,
            "--units",
            "10",
            "--sales-price",
            "100000",
            "--direct-cost",
            "50000",
            "--purchase-price",
            "200000",
        ],
    )
}

/// Force a deal into a stage, skipping pipeline-order checks
pub fn set_stage(tmp: &TempDir, deal: &str, stage: &str) {
    plat()
        .current_dir(tmp.path())
        .args(["deal", "stage", deal, stage, "--force"])
        .assert()
        .success();
}
