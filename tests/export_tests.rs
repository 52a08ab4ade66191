//! Integration tests for CSV export

mod common;

use common::{
    create_contact_with, create_deal, create_deal_with, create_reference_proforma,
    create_task_with, plat, setup_test_project,
};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_export_deals_writes_csv_to_stdout() {
    let tmp = setup_test_project();
    create_deal_with(&tmp, "Riverside Flats", &["-v", "1200000", "-m", "Austin"]);

    let output = plat()
        .current_dir(tmp.path())
        .args(["export", "deals"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let csv = String::from_utf8_lossy(&output.stdout);
    let mut lines = csv.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,title,stage"));
    assert!(header.contains("estimated_value"));

    let row = lines.next().unwrap();
    assert!(row.contains("Riverside Flats"));
    assert!(row.contains("prospecting"));
    assert!(row.contains("1200000.00"));
    assert!(row.contains("Austin"));
}

#[test]
fn test_export_writes_to_file_with_confirmation() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");

    plat()
        .current_dir(tmp.path())
        .args(["export", "deals", "-o", "deals.csv"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Exported"));

    let content = fs::read_to_string(tmp.path().join("deals.csv")).unwrap();
    assert!(content.contains("Riverside Flats"));
}

#[test]
fn test_export_tasks() {
    let tmp = setup_test_project();
    create_task_with(&tmp, "Order survey", &["--due", "2026-09-30", "-p", "high"]);

    let output = plat()
        .current_dir(tmp.path())
        .args(["export", "tasks"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let csv = String::from_utf8_lossy(&output.stdout);
    assert!(csv.starts_with("id,title,status"));
    assert!(csv.contains("Order survey"));
    assert!(csv.contains("todo"));
    assert!(csv.contains("high"));
    assert!(csv.contains("2026-09-30"));
}

#[test]
fn test_export_contacts() {
    let tmp = setup_test_project();
    create_contact_with(&tmp, "Dana Reeve", &["-R", "broker", "-c", "Apex Land Co"]);

    let output = plat()
        .current_dir(tmp.path())
        .args(["export", "contacts"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let csv = String::from_utf8_lossy(&output.stdout);
    assert!(csv.starts_with("id,name,role"));
    assert!(csv.contains("Dana Reeve"));
    assert!(csv.contains("broker"));
    assert!(csv.contains("Apex Land Co"));
}

#[test]
fn test_export_proformas_includes_computed_profit() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");
    create_reference_proforma(&tmp, "Base Case", "DEAL@1");

    let output = plat()
        .current_dir(tmp.path())
        .args(["export", "proformas"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let csv = String::from_utf8_lossy(&output.stdout);
    let header = csv.lines().next().unwrap();
    assert!(header.contains("gross_revenue"));
    assert!(header.contains("total_costs"));
    assert!(header.contains("profit"));
    assert!(header.contains("margin_pct"));

    // The worked example: $1M gross, $735k costs, $235k profit
    assert!(csv.contains("1000000.00"));
    assert!(csv.contains("735000.00"));
    assert!(csv.contains("235000.00"));
}

#[test]
fn test_export_empty_project_emits_header_only() {
    let tmp = setup_test_project();

    let output = plat()
        .current_dir(tmp.path())
        .args(["export", "deals"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let csv = String::from_utf8_lossy(&output.stdout);
    assert_eq!(csv.lines().count(), 1);
}
