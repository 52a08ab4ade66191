//! Integration tests for task commands

mod common;

use common::{create_deal, create_task, create_task_with, plat, setup_test_project};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_new_task_creates_file() {
    let tmp = setup_test_project();
    let id = create_task(&tmp, "Order phase one survey");

    let path = tmp.path().join("tasks").join(format!("{}.plat.yaml", id));
    assert!(path.is_file());

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("Order phase one survey"));
    assert!(content.contains("status: todo"));
    assert!(content.contains("priority: medium"));
}

#[test]
fn test_new_task_records_due_date_and_priority() {
    let tmp = setup_test_project();
    let id = create_task_with(
        &tmp,
        "File entitlement package",
        &["--due", "2026-09-30", "-p", "high"],
    );

    let path = tmp.path().join("tasks").join(format!("{}.plat.yaml", id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("due_date: 2026-09-30"));
    assert!(content.contains("priority: high"));
}

#[test]
fn test_new_task_links_deal() {
    let tmp = setup_test_project();
    let deal_id = create_deal(&tmp, "Riverside Flats");
    let task_id = create_task_with(&tmp, "Order survey", &["-d", "DEAL@1"]);

    let path = tmp
        .path()
        .join("tasks")
        .join(format!("{}.plat.yaml", task_id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains(&deal_id));
}

#[test]
fn test_new_task_rejects_bad_due_date() {
    let tmp = setup_test_project();

    plat()
        .current_dir(tmp.path())
        .args(["task", "new", "--title", "X", "--due", "someday", "--no-edit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_new_task_rejects_unknown_priority() {
    let tmp = setup_test_project();

    plat()
        .current_dir(tmp.path())
        .args(["task", "new", "--title", "X", "-p", "urgent", "--no-edit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown priority"));
}

#[test]
fn test_done_completes_task() {
    let tmp = setup_test_project();
    let id = create_task(&tmp, "Order survey");

    plat()
        .current_dir(tmp.path())
        .args(["task", "done", "TASK@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed"))
        .stdout(predicate::str::contains("Order survey"));

    let path = tmp.path().join("tasks").join(format!("{}.plat.yaml", id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("status: completed"));
    assert!(content.contains("completed_date: 20"));
    assert!(content.contains("revision: 2"));
}

#[test]
fn test_done_twice_reports_already_completed() {
    let tmp = setup_test_project();
    create_task(&tmp, "Order survey");

    plat()
        .current_dir(tmp.path())
        .args(["task", "done", "TASK@1"])
        .assert()
        .success();

    plat()
        .current_dir(tmp.path())
        .args(["task", "done", "TASK@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already completed"));
}

#[test]
fn test_done_flags_late_completion() {
    let tmp = setup_test_project();
    create_task_with(&tmp, "Order survey", &["--due", "2020-01-01"]);

    plat()
        .current_dir(tmp.path())
        .args(["task", "done", "TASK@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("late"));
}

#[test]
fn test_done_flags_on_time_completion() {
    let tmp = setup_test_project();
    create_task_with(&tmp, "Order survey", &["--due", "2099-01-01"]);

    plat()
        .current_dir(tmp.path())
        .args(["task", "done", "TASK@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("on time"));
}

#[test]
fn test_done_accepts_explicit_date() {
    let tmp = setup_test_project();
    let id = create_task_with(&tmp, "Order survey", &["--due", "2026-06-30"]);

    plat()
        .current_dir(tmp.path())
        .args(["task", "done", "TASK@1", "--date", "2026-06-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("on time"));

    let path = tmp.path().join("tasks").join(format!("{}.plat.yaml", id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("completed_date: 2026-06-15"));
}

#[test]
fn test_list_default_hides_completed() {
    let tmp = setup_test_project();
    create_task(&tmp, "Open Task");
    create_task(&tmp, "Finished Task");

    plat()
        .current_dir(tmp.path())
        .args(["task", "done", "TASK@2"])
        .assert()
        .success();

    plat()
        .current_dir(tmp.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Open Task"))
        .stdout(predicate::str::contains("Finished Task").not());

    plat()
        .current_dir(tmp.path())
        .args(["task", "list", "-s", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Open Task"))
        .stdout(predicate::str::contains("Finished Task"));
}

#[test]
fn test_list_overdue_filter() {
    let tmp = setup_test_project();
    create_task_with(&tmp, "Long Overdue", &["--due", "2020-01-01"]);
    create_task_with(&tmp, "Far Future", &["--due", "2099-01-01"]);

    plat()
        .current_dir(tmp.path())
        .args(["task", "list", "--overdue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Long Overdue"))
        .stdout(predicate::str::contains("Far Future").not());
}

#[test]
fn test_list_overdue_tasks_get_marker() {
    let tmp = setup_test_project();
    create_task_with(&tmp, "Long Overdue", &["--due", "2020-01-01"]);

    plat()
        .current_dir(tmp.path())
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2020-01-01 !"));
}

#[test]
fn test_list_priority_filter() {
    let tmp = setup_test_project();
    create_task_with(&tmp, "Critical Path Item", &["-p", "critical"]);
    create_task(&tmp, "Routine Item");

    plat()
        .current_dir(tmp.path())
        .args(["task", "list", "-p", "critical"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Critical Path Item"))
        .stdout(predicate::str::contains("Routine Item").not());
}

#[test]
fn test_list_deal_filter() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");
    create_task_with(&tmp, "Linked Task", &["-d", "DEAL@1"]);
    create_task(&tmp, "Floating Task");

    plat()
        .current_dir(tmp.path())
        .args(["task", "list", "-d", "DEAL@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Linked Task"))
        .stdout(predicate::str::contains("Floating Task").not());
}

#[test]
fn test_status_moves_task_forward() {
    let tmp = setup_test_project();
    let id = create_task(&tmp, "Negotiate easement");

    plat()
        .current_dir(tmp.path())
        .args(["task", "status", &id, "in_progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("todo → in_progress"));

    let path = tmp.path().join("tasks").join(format!("{}.plat.yaml", id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("status: in_progress"));
    assert!(content.contains("revision: 2"));
}

#[test]
fn test_status_completed_stamps_date() {
    let tmp = setup_test_project();
    let id = create_task(&tmp, "Close escrow file");

    plat()
        .current_dir(tmp.path())
        .args(["task", "status", &id, "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed_date stamped"));

    let path = tmp.path().join("tasks").join(format!("{}.plat.yaml", id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("status: completed"));
    assert!(content.contains("completed_date: 20"));
}

#[test]
fn test_status_same_status_is_noop() {
    let tmp = setup_test_project();
    let id = create_task(&tmp, "Stake the corners");

    plat()
        .current_dir(tmp.path())
        .args(["task", "status", &id, "todo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is already todo"));

    let path = tmp.path().join("tasks").join(format!("{}.plat.yaml", id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("revision: 1"));
}

#[test]
fn test_status_rejects_unknown_status() {
    let tmp = setup_test_project();
    let id = create_task(&tmp, "Set up draw schedule");

    plat()
        .current_dir(tmp.path())
        .args(["task", "status", &id, "paused"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown status"));
}

#[test]
fn test_status_reopen_clears_completion() {
    let tmp = setup_test_project();
    let id = create_task(&tmp, "Pull demo permit");

    plat()
        .current_dir(tmp.path())
        .args(["task", "done", &id])
        .assert()
        .success();

    plat()
        .current_dir(tmp.path())
        .args(["task", "status", &id, "blocked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("completed → blocked"));

    let path = tmp.path().join("tasks").join(format!("{}.plat.yaml", id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("status: blocked"));
    assert!(!content.contains("completed_date:"));
}
