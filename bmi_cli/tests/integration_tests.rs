//! Integration tests for the bmi binary.
//!
//! These tests verify end-to-end behavior including:
//! - Calculation and classification output
//! - History file creation and format
//! - Rejected input leaving the history untouched
//! - History, chart and export read paths

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary, isolated from any real user config
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bmi"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

fn history_path(temp_dir: &TempDir) -> std::path::PathBuf {
    temp_dir.path().join("data").join("bmi_history.json")
}

fn read_history(path: &Path) -> serde_json::Value {
    let contents = fs::read_to_string(path).expect("Failed to read history");
    serde_json::from_str(&contents).expect("History is not valid JSON")
}

fn calc(temp_dir: &TempDir, weight: &str, height: &str) -> assert_cmd::assert::Assert {
    cli(temp_dir)
        .arg("calc")
        .arg("--weight")
        .arg(weight)
        .arg("--height")
        .arg(height)
        .assert()
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Body Mass Index calculator with history",
        ));
}

#[test]
fn test_normal_scenario() {
    let temp_dir = setup_test_dir();

    calc(&temp_dir, "70", "1.75")
        .success()
        .stdout(predicate::str::contains("BMI: 22.86"))
        .stdout(predicate::str::contains("Category: Normal"))
        .stdout(predicate::str::contains("Saved as user_1"));

    let history = read_history(&history_path(&temp_dir));
    let records = history["user_1"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    let bmi = records[0]["bmi"].as_f64().unwrap();
    assert!((bmi - 70.0 / (1.75 * 1.75)).abs() < 1e-9);
    assert_eq!(records[0]["date"].as_str().unwrap().len(), "2024-01-01 10:00".len());
}

#[test]
fn test_second_scenario() {
    let temp_dir = setup_test_dir();
    calc(&temp_dir, "50", "1.60")
        .success()
        .stdout(predicate::str::contains("BMI: 19.53"))
        .stdout(predicate::str::contains("Category: Normal"));
}

#[test]
fn test_obese_scenario() {
    let temp_dir = setup_test_dir();
    calc(&temp_dir, "100", "1.70")
        .success()
        .stdout(predicate::str::contains("BMI: 34.60"))
        .stdout(predicate::str::contains("Category: Obese"));
}

#[test]
fn test_negative_weight_rejected_without_saving() {
    let temp_dir = setup_test_dir();

    calc(&temp_dir, "-5", "1.70")
        .code(2)
        .stderr(predicate::str::contains("Input error"));

    assert!(!history_path(&temp_dir).exists());
}

#[test]
fn test_non_numeric_rejected() {
    let temp_dir = setup_test_dir();

    calc(&temp_dir, "heavy", "1.70")
        .code(2)
        .stderr(predicate::str::contains("weight must be a number"));

    assert!(!history_path(&temp_dir).exists());
}

#[test]
fn test_zero_height_rejected() {
    let temp_dir = setup_test_dir();
    calc(&temp_dir, "70", "0").code(2);
    assert!(!history_path(&temp_dir).exists());
}

#[test]
fn test_prompts_for_missing_values() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .write_stdin("70\n1.75\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Weight (kg):"))
        .stdout(predicate::str::contains("Height (m):"))
        .stdout(predicate::str::contains("BMI: 22.86"));

    assert!(history_path(&temp_dir).exists());
}

#[test]
fn test_dry_run_does_not_save() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["calc", "--weight", "70", "--height", "1.75", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!history_path(&temp_dir).exists());
}

#[test]
fn test_each_calculation_gets_new_user_by_default() {
    let temp_dir = setup_test_dir();

    calc(&temp_dir, "70", "1.75").success();
    calc(&temp_dir, "72", "1.75")
        .success()
        .stdout(predicate::str::contains("Saved as user_2"));

    let history = read_history(&history_path(&temp_dir));
    let users = history.as_object().unwrap();
    assert_eq!(users.len(), 2);
}

#[test]
fn test_explicit_user_accumulates() {
    let temp_dir = setup_test_dir();

    for weight in ["70", "71", "72"] {
        cli(&temp_dir)
            .args(["calc", "--user", "sam", "--height", "1.75", "--weight", weight])
            .assert()
            .success();
    }

    let history = read_history(&history_path(&temp_dir));
    assert_eq!(history["sam"].as_array().unwrap().len(), 3);
    assert_eq!(history.as_object().unwrap().len(), 1);
}

#[test]
fn test_history_lists_records() {
    let temp_dir = setup_test_dir();

    calc(&temp_dir, "70", "1.75").success();
    calc(&temp_dir, "100", "1.70").success();

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("user_1"))
        .stdout(predicate::str::contains("22.86"))
        .stdout(predicate::str::contains("user_2"))
        .stdout(predicate::str::contains("34.60"))
        .stdout(predicate::str::contains("Obese"));
}

#[test]
fn test_history_empty() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No history yet"));
}

#[test]
fn test_chart_renders_legend() {
    let temp_dir = setup_test_dir();

    calc(&temp_dir, "70", "1.75").success();
    calc(&temp_dir, "80", "1.75").success();

    cli(&temp_dir)
        .args(["chart", "--width", "30", "--height", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* user_1"))
        .stdout(predicate::str::contains("o user_2"));
}

#[test]
fn test_chart_without_history() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .arg("chart")
        .assert()
        .success()
        .stdout(predicate::str::contains("No history to chart"));
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("export.csv");

    calc(&temp_dir, "70", "1.75").success();

    cli(&temp_dir)
        .arg("export")
        .arg("--output")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 records"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("user,date,bmi,category\n"));
    assert!(csv.contains("user_1,"));
    assert!(csv.contains(",Normal"));
}

#[test]
fn test_existing_history_is_extended() {
    let temp_dir = setup_test_dir();
    let path = history_path(&temp_dir);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"user_1": [{"date": "2024-01-01 10:00", "bmi": 23.15}]}"#,
    )
    .unwrap();

    calc(&temp_dir, "70", "1.75")
        .success()
        .stdout(predicate::str::contains("Saved as user_2"));

    let history = read_history(&path);
    assert_eq!(history["user_1"][0]["bmi"].as_f64().unwrap(), 23.15);
    assert_eq!(history["user_2"].as_array().unwrap().len(), 1);
}

#[test]
fn test_overflowing_result_rejected_without_saving() {
    let temp_dir = setup_test_dir();
    calc(&temp_dir, "70", "1.75").success();
    let before = fs::read_to_string(history_path(&temp_dir)).unwrap();

    calc(&temp_dir, "1e300", "1e-5")
        .code(2)
        .stderr(predicate::str::contains("Input error"));
    calc(&temp_dir, "1e-320", "1e10").code(2);

    assert_eq!(fs::read_to_string(history_path(&temp_dir)).unwrap(), before);

    // History still loads afterwards
    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("22.86"));
}

#[test]
fn test_user_filters_match_trimmed_ids() {
    let temp_dir = setup_test_dir();

    cli(&temp_dir)
        .args(["calc", "--user", " sam", "--weight", "70", "--height", "1.75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved as sam"));
    calc(&temp_dir, "100", "1.70").success();

    cli(&temp_dir)
        .args(["history", "--user", " sam"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sam"))
        .stdout(predicate::str::contains("22.86"))
        .stdout(predicate::str::contains("34.60").not());

    cli(&temp_dir)
        .args(["chart", "--user", "sam "])
        .assert()
        .success()
        .stdout(predicate::str::contains("* sam"))
        .stdout(predicate::str::contains("No history to chart").not());
}
