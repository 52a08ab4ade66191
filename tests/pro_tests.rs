//! Integration tests for proforma commands

mod common;

use common::{
    create_deal, create_proforma, create_reference_proforma, plat, setup_test_project,
};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_new_requires_a_deal() {
    let tmp = setup_test_project();

    plat()
        .current_dir(tmp.path())
        .args(["pro", "new", "--title", "Base Case", "--no-edit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must reference a deal"));
}

#[test]
fn test_new_creates_file_under_financials() {
    let tmp = setup_test_project();
    let deal_id = create_deal(&tmp, "Riverside Flats");
    let pro_id = create_proforma(&tmp, "Base Case", "DEAL@1");

    let path = tmp
        .path()
        .join("financials/proformas")
        .join(format!("{}.plat.yaml", pro_id));
    assert!(path.is_file());

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("Base Case"));
    assert!(content.contains(&deal_id));
}

#[test]
fn test_new_resolves_deal_by_title() {
    let tmp = setup_test_project();
    let deal_id = create_deal(&tmp, "Riverside Flats");
    let pro_id = create_proforma(&tmp, "Base Case", "riverside");

    let path = tmp
        .path()
        .join("financials/proformas")
        .join(format!("{}.plat.yaml", pro_id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains(&deal_id));
}

#[test]
fn test_new_records_unit_economics() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");
    let pro_id = create_reference_proforma(&tmp, "Base Case", "DEAL@1");

    let path = tmp
        .path()
        .join("financials/proformas")
        .join(format!("{}.plat.yaml", pro_id));
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("number_of_units: 10"));
    assert!(content.contains("sales_price_per_unit: 100000"));
    assert!(content.contains("direct_cost_per_unit: 50000"));
    assert!(content.contains("purchase_price: 200000"));
}

#[test]
fn test_show_reports_profit_breakdown() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");
    create_reference_proforma(&tmp, "Base Case", "DEAL@1");

    // 10 units at $100k gross / $50k direct on $200k land, default
    // assumptions: $735k all-in costs against $1M gross
    plat()
        .current_dir(tmp.path())
        .args(["pro", "show", "PRO@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$1,000,000"))
        .stdout(predicate::str::contains("$735,000"))
        .stdout(predicate::str::contains("$235,000"))
        .stdout(predicate::str::contains("32.0%"));
}

#[test]
fn test_show_reports_profit_per_unit() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");
    create_reference_proforma(&tmp, "Base Case", "DEAL@1");

    plat()
        .current_dir(tmp.path())
        .args(["pro", "show", "PRO@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profit per unit"))
        .stdout(predicate::str::contains("$23,500"));
}

#[test]
fn test_list_empty_project() {
    let tmp = setup_test_project();

    plat()
        .current_dir(tmp.path())
        .args(["pro", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No proformas found."));
}

#[test]
fn test_list_shows_computed_profit() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");
    create_reference_proforma(&tmp, "Base Case", "DEAL@1");

    plat()
        .current_dir(tmp.path())
        .args(["pro", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Base Case"))
        .stdout(predicate::str::contains("$235,000"))
        .stdout(predicate::str::contains("1 proforma found"));
}

#[test]
fn test_list_filters_by_deal() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");
    create_deal(&tmp, "Mill District");
    create_proforma(&tmp, "Riverside Base", "DEAL@1");
    create_proforma(&tmp, "Mill Base", "DEAL@2");

    plat()
        .current_dir(tmp.path())
        .args(["pro", "list", "-d", "DEAL@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Riverside Base"))
        .stdout(predicate::str::contains("Mill Base").not());
}

#[test]
fn test_list_format_json_is_parseable() {
    let tmp = setup_test_project();
    create_deal(&tmp, "Riverside Flats");
    create_reference_proforma(&tmp, "Base Case", "DEAL@1");

    let output = plat()
        .current_dir(tmp.path())
        .args(["pro", "list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["number_of_units"], 10);
}
