//! Integration tests for the lift binary.
//!
//! These tests verify end-to-end behavior including:
//! - Journal loading (CSV and JSONL)
//! - Record listing and new-record detection
//! - Progression suggestions
//! - Volume and balance reports

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const JOURNAL: &str = "\
date,exercise,weight,reps,rpe
2025-01-06,Squat,100,5,7
2025-01-06,Squat,100,5,7
2025-01-06,Bench Press,80,12,6
2025-01-09,Squat,102.5,5,8
2025-01-09,Barbell Row,70,10,7
2025-01-13,Squat,105,5,8
2025-01-13,Bench Press,85,12,6
2025-01-13,Front Squat,80,5,
2025-01-13,Front Squat,85,3,
";

/// Helper to create a test data directory with a journal
fn setup_journal(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("journal.csv");
    fs::write(&path, contents).expect("Failed to write journal");
    (temp_dir, path)
}

/// Helper to get the CLI binary with an isolated config directory
fn cli(config_home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd.env("HOME", config_home);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_json(dir: &Path, journal: &Path, args: &[&str]) -> serde_json::Value {
    let output = cli(dir)
        .arg("--journal")
        .arg(journal)
        .arg("--json")
        .args(args)
        .output()
        .expect("Failed to run lift");
    assert!(output.status.success(), "lift {:?} failed", args);
    serde_json::from_slice(&output.stdout).expect("Invalid JSON output")
}

#[test]
fn test_cli_help() {
    let temp_dir = tempfile::tempdir().unwrap();
    cli(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strength training analytics"));
}

#[test]
fn test_prs_text_output() {
    let (temp_dir, journal) = setup_journal(JOURNAL);

    cli(temp_dir.path())
        .arg("--journal")
        .arg(&journal)
        .arg("prs")
        .arg("squat")
        .assert()
        .success()
        .stdout(predicate::str::contains("Squat (3 sessions)"))
        .stdout(predicate::str::contains("122.5"))
        .stdout(predicate::str::contains("5RM"));
}

#[test]
fn test_prs_json_output() {
    let (temp_dir, journal) = setup_journal(JOURNAL);
    let report = run_json(temp_dir.path(), &journal, &["prs", "Squat"]);

    assert_eq!(report["records"]["has_data"], true);
    assert_eq!(report["records"]["e1rm"]["value"], 122.5);
    assert_eq!(report["records"]["rep_maxes"]["5"]["weight"], 105.0);
    assert_eq!(report["records"]["volume_pr"]["value"], 525.0);
    assert_eq!(report["sessions"][0]["date"], "2025-01-13");
    assert_eq!(report["sessions"][0]["prs"]["has_pr"], true);
}

#[test]
fn test_prs_unknown_exercise() {
    let (temp_dir, journal) = setup_journal(JOURNAL);

    cli(temp_dir.path())
        .arg("--journal")
        .arg(&journal)
        .arg("prs")
        .arg("Snatch")
        .assert()
        .success()
        .stdout(predicate::str::contains("No history for Snatch"));
}

#[test]
fn test_suggest_increase_weight() {
    let (temp_dir, journal) = setup_journal(JOURNAL);
    let result = run_json(
        temp_dir.path(),
        &journal,
        &["suggest", "Bench Press", "--reps", "8-12"],
    );

    let suggestion = &result["suggestion"];
    assert_eq!(suggestion["status"], "ready");
    assert_eq!(suggestion["recommendation"], "increase_weight");
    assert_eq!(suggestion["weight_change"], 5.0);
    assert_eq!(suggestion["rep_change"], -4);
    assert_eq!(suggestion["suggested_weight"], 90.0);
    assert_eq!(suggestion["suggested_reps"], 8);
}

#[test]
fn test_suggest_all_categorizes() {
    let (temp_dir, journal) = setup_journal(JOURNAL);
    let categories = run_json(temp_dir.path(), &journal, &["suggest", "--reps", "8-12"]);

    let names = |key: &str| -> Vec<String> {
        categories[key]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["exercise_name"].as_str().unwrap().to_string())
            .collect()
    };

    assert_eq!(names("ready"), vec!["Bench Press"]);
    assert_eq!(names("maintain"), vec!["Squat"]);
    assert_eq!(names("no_data"), vec!["Barbell Row", "Front Squat"]);
}

#[test]
fn test_check_reports_latest_workout_records() {
    let (temp_dir, journal) = setup_journal(JOURNAL);
    let events = run_json(temp_dir.path(), &journal, &["check"]);
    let events = events.as_array().unwrap();

    let first = events
        .iter()
        .find(|e| e["exercise_name"] == "Front Squat")
        .expect("Front Squat first-time event");
    assert_eq!(first["pr_type"]["kind"], "first");
    assert_eq!(first["weight"], 85.0);
    assert_eq!(first["reps"], 3);

    let squat: Vec<_> = events
        .iter()
        .filter(|e| e["exercise_name"] == "Squat")
        .collect();
    assert_eq!(squat.len(), 3);
    assert_eq!(squat[0]["pr_type"]["kind"], "e1rm");
    assert_eq!(squat[1]["pr_type"]["reps"], 5);
    assert_eq!(squat[1]["previous_value"], 102.5);
}

#[test]
fn test_check_text_output() {
    let (temp_dir, journal) = setup_journal(JOURNAL);

    cli(temp_dir.path())
        .arg("--journal")
        .arg(&journal)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("new record(s) on 2025-01-13"))
        .stdout(predicate::str::contains("Front Squat: first session"));
}

#[test]
fn test_volume_weeks() {
    let (temp_dir, journal) = setup_journal(JOURNAL);

    let weeks = run_json(temp_dir.path(), &journal, &["volume", "--weeks", "1"]);
    let weeks = weeks.as_array().unwrap();
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0]["week_key"], "2025-W03");

    let all = run_json(temp_dir.path(), &journal, &["volume"]);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["week_key"], "2025-W02");
    assert_eq!(all[0]["label"], "Jan 6");
}

#[test]
fn test_balance_output() {
    let (temp_dir, journal) = setup_journal(JOURNAL);

    let balance = run_json(temp_dir.path(), &journal, &["balance"]);
    let push = balance["push_pct"].as_u64().unwrap();
    let pull = balance["pull_pct"].as_u64().unwrap();
    assert_eq!(push + pull, 100);
    assert_eq!(
        balance["upper_pct"].as_u64().unwrap() + balance["lower_pct"].as_u64().unwrap(),
        100
    );

    cli(temp_dir.path())
        .arg("--journal")
        .arg(&journal)
        .arg("balance")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push/Pull"));
}

#[test]
fn test_missing_journal_is_empty() {
    let temp_dir = tempfile::tempdir().unwrap();
    let journal = temp_dir.path().join("missing.csv");

    cli(temp_dir.path())
        .arg("--journal")
        .arg(&journal)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Journal is empty"));
}

#[test]
fn test_jsonl_journal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let journal = temp_dir.path().join("journal.jsonl");
    fs::write(
        &journal,
        "{\"date\":\"2025-01-03\",\"exercise\":\"Deadlift\",\"weight\":180,\"reps\":5}\n\
         {\"date\":\"2025-01-03\",\"exercise\":\"Deadlift\",\"weight\":200,\"reps\":1}\n",
    )
    .unwrap();

    let report = run_json(temp_dir.path(), &journal, &["prs", "deadlift"]);
    assert_eq!(report["exercise_name"], "Deadlift");
    assert_eq!(report["records"]["e1rm"]["value"], 210.0);
    assert_eq!(report["records"]["rep_maxes"]["1"]["weight"], 200.0);
}

#[test]
fn test_config_file_overrides_tracked_reps() {
    let (temp_dir, journal) = setup_journal(JOURNAL);
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[records]\ntracked_rep_counts = [12]\n").unwrap();

    let output = cli(temp_dir.path())
        .arg("--journal")
        .arg(&journal)
        .arg("--config")
        .arg(&config_path)
        .arg("--json")
        .arg("prs")
        .arg("Bench Press")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rep_maxes = report["records"]["rep_maxes"].as_object().unwrap();
    assert_eq!(rep_maxes.len(), 1);
    assert_eq!(rep_maxes["12"]["weight"], 85.0);
}

#[test]
fn test_invalid_config_fails() {
    let (temp_dir, journal) = setup_journal(JOURNAL);
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[records]\ntracked_rep_counts = []\n").unwrap();

    cli(temp_dir.path())
        .arg("--journal")
        .arg(&journal)
        .arg("--config")
        .arg(&config_path)
        .arg("balance")
        .assert()
        .failure();
}
