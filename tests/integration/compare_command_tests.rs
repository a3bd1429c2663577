//! Integration tests for the compare command

use crate::common::{assertions, sample_data, CliTestRunner};
use std::fs;

fn runner_with_samples() -> CliTestRunner {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_csv("baseline.csv", &sample_data::baseline_csv_data())
        .unwrap();
    runner
        .fixture()
        .create_csv("updated.csv", &sample_data::updated_csv_data())
        .unwrap();
    runner
        .fixture()
        .create_csv("extra.csv", &sample_data::extra_column_csv_data())
        .unwrap();
    runner
}

#[test]
fn test_compare_json_report() {
    let runner = runner_with_samples();
    let report = runner.compare_json("baseline.csv", "updated.csv", &["--key", "id"]);

    assertions::assert_summary(&report, 1, 1, 1, 1);
    assert_eq!(report["key_columns"], serde_json::json!(["id"]));
    assert_eq!(report["status_column"], "status");

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[0]["price"], 1.6);
    assert_eq!(rows[0]["status"], "Modified");
    assert_eq!(rows[3]["name"], "Date");
    assert_eq!(rows[3]["status"], "Added");

    let changes = report["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["cells"][0]["column"], "price");
}

#[test]
fn test_compare_csv_output() {
    let runner = runner_with_samples();
    let output = runner.fixture().path("out.csv");

    runner.expect_success(&[
        "compare",
        "baseline.csv",
        "updated.csv",
        "--key",
        "id",
        "--exclude-unchanged",
        "--format",
        "csv",
        "--output",
        output.to_str().unwrap(),
    ]);

    assertions::assert_file_exists_and_not_empty(&output);
    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "id,name,price,status",
            "1,Apple,1.6,Modified",
            "3,Cherry,2.0,Deleted",
            "4,Date,3.0,Added",
        ]
    );
}

#[test]
fn test_compare_pretty_output_to_file() {
    let runner = runner_with_samples();
    let output = runner.fixture().path("out.txt");

    runner.expect_success(&[
        "compare",
        "baseline.csv",
        "updated.csv",
        "-k",
        "id",
        "--output",
        output.to_str().unwrap(),
    ]);

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("├─ Key: id"));
    assert!(content.contains("├─ Modified: 1"));
    assert!(content.contains("price: '1.5' → '1.6'"));
}

#[test]
fn test_positional_compare_without_key() {
    let runner = runner_with_samples();
    let report = runner.compare_json("baseline.csv", "baseline.csv", &[]);

    assertions::assert_summary(&report, 0, 0, 0, 3);
    assert_eq!(report["key_columns"], serde_json::json!([]));
}

#[test]
fn test_missing_column_policies_from_cli() {
    let runner = runner_with_samples();

    let pad = runner.compare_json("baseline.csv", "extra.csv", &["-k", "id"]);
    assertions::assert_summary(&pad, 0, 0, 2, 1);

    let ignore = runner.compare_json(
        "baseline.csv",
        "extra.csv",
        &["-k", "id", "--missing-columns", "ignore"],
    );
    assertions::assert_summary(&ignore, 0, 0, 0, 3);

    let mismatch = runner.compare_json(
        "baseline.csv",
        "extra.csv",
        &["-k", "id", "--missing-columns", "mismatch"],
    );
    assertions::assert_summary(&mismatch, 0, 0, 3, 0);
}

#[test]
fn test_config_file_applies_and_flags_override() {
    let runner = runner_with_samples();
    runner
        .fixture()
        .create_raw(
            "tabrecon.json",
            r#"{ "missing_columns": "ignore", "status_column": "_diff" }"#,
        )
        .unwrap();

    let from_config = runner.compare_json("baseline.csv", "extra.csv", &["-k", "id"]);
    assertions::assert_summary(&from_config, 0, 0, 0, 3);
    assert_eq!(from_config["rows"][0]["_diff"], "Unchanged");

    let overridden = runner.compare_json(
        "baseline.csv",
        "extra.csv",
        &["-k", "id", "--missing-columns", "mismatch", "--status-column", "change"],
    );
    assertions::assert_summary(&overridden, 0, 0, 3, 0);
    assert_eq!(overridden["status_column"], "change");
}

#[test]
fn test_fingerprint_is_stable_across_runs() {
    let runner = runner_with_samples();
    let first = runner.compare_json("baseline.csv", "updated.csv", &["-k", "id"]);
    let second = runner.compare_json("baseline.csv", "updated.csv", &["-k", "id"]);

    assert_eq!(first["fingerprint"], second["fingerprint"]);
}

#[test]
fn test_parallel_classification_on_large_files() {
    let runner = CliTestRunner::new().unwrap();
    runner
        .fixture()
        .create_large_csv("big_left.csv", 5000, 10, false)
        .unwrap();
    runner
        .fixture()
        .create_large_csv("big_right.csv", 5000, 10, true)
        .unwrap();

    let report = runner.compare_json(
        "big_left.csv",
        "big_right.csv",
        &["-k", "id", "--exclude-unchanged"],
    );

    assertions::assert_summary(&report, 0, 0, 500, 4500);
    assert_eq!(report["rows"].as_array().unwrap().len(), 500);
}
