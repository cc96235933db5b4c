//! CLI integration tests
//!
//! These run the built binary against a database in a TempDir and check
//! both the human-readable and JSON outputs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(dir: &TempDir, args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_regwatch-cli");
    let db = dir.path().join("store.db");
    Command::new(cli_bin)
        .current_dir(dir.path())
        .args(args)
        .args(["--db", db.to_str().unwrap()])
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_export(dir: &Path, name: &str, fac_number: &str, parts: serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    let doc = serde_json::json!({
        "version_info": {"fac_number": fac_number, "effective_date": "2025-10-01"},
        "parts": parts,
    });
    fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
    path
}

fn capture(dir: &TempDir, file: &Path) -> Output {
    run(dir, &["capture", "--file", file.to_str().unwrap()])
}

#[test]
fn test_capture_then_change_prints_markdown_report() {
    let dir = TempDir::new().unwrap();
    let v1 = write_export(
        dir.path(),
        "v1.json",
        "2025-01",
        serde_json::json!({"A": {"content": "Submit by March 1."}, "B": "Old rule."}),
    );
    let v2 = write_export(
        dir.path(),
        "v2.json",
        "2025-02",
        serde_json::json!({"A": {"content": "Submit by March 15."}, "C": "New rule."}),
    );

    let first = capture(&dir, &v1);
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    assert!(stdout(&first).contains("Recorded first version 2025-01"));

    let second = capture(&dir, &v2);
    assert!(second.status.success());
    let report = stdout(&second);
    assert!(report.contains("# Regulation Change Report"));
    assert!(report.contains("### Change 1: C"));
    assert!(report.contains("```diff"));

    let again = capture(&dir, &v2);
    assert!(stdout(&again).contains("No new content"));
}

#[test]
fn test_compare_json_and_threshold_override() {
    let dir = TempDir::new().unwrap();
    let v1 = write_export(
        dir.path(),
        "v1.json",
        "2025-01",
        serde_json::json!({"A": "Submit by March 1."}),
    );
    let v2 = write_export(
        dir.path(),
        "v2.json",
        "2025-02",
        serde_json::json!({"A": "Submit by March 15."}),
    );
    capture(&dir, &v1);
    capture(&dir, &v2);

    let output = run(&dir, &["compare", "--format", "json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcome"], "changed");
    assert_eq!(json["summary"]["modified"], 1);

    let output = run(&dir, &["compare", "--threshold", "0.5", "--format", "json"]);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcome"], "no_changes");
}

#[test]
fn test_history_stats_and_captures() {
    let dir = TempDir::new().unwrap();
    let v1 = write_export(dir.path(), "v1.json", "2025-01", serde_json::json!({"A": "x"}));
    let v2 = write_export(dir.path(), "v2.json", "2025-02", serde_json::json!({"A": "y"}));
    capture(&dir, &v1);
    capture(&dir, &v2);
    capture(&dir, &v2);

    let history = run(&dir, &["history", "--format", "json"]);
    let history: serde_json::Value = serde_json::from_slice(&history.stdout).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[1]["is_latest"], true);

    let stats = run(&dir, &["stats", "--format", "json"]);
    let stats: serde_json::Value = serde_json::from_slice(&stats.stdout).unwrap();
    assert_eq!(stats["snapshot_count"], 2);
    assert_eq!(stats["capture_count"], 3);
    assert_eq!(stats["duplicate_capture_count"], 1);

    let captures = run(&dir, &["captures", "--limit", "1", "--format", "json"]);
    let captures: serde_json::Value = serde_json::from_slice(&captures.stdout).unwrap();
    assert_eq!(captures.as_array().unwrap().len(), 1);
    assert_eq!(captures[0]["status"], "duplicate");
}

#[test]
fn test_prune_keeps_recent_history() {
    let dir = TempDir::new().unwrap();
    let v1 = write_export(dir.path(), "v1.json", "2025-01", serde_json::json!({"A": "x"}));
    capture(&dir, &v1);

    let output = run(&dir, &["prune", "--days", "7", "--format", "json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["snapshots_deleted"], 0);
}

#[test]
fn test_compare_without_history() {
    let dir = TempDir::new().unwrap();
    let output = run(&dir, &["compare", "--document", "dfars"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No versions of dfars have been captured."));
}

#[test]
fn test_errors_exit_non_zero() {
    let dir = TempDir::new().unwrap();

    let missing = run(&dir, &["capture", "--file", "does-not-exist.json"]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("ERR_IO"));

    let bad_threshold = run(&dir, &["compare", "--threshold", "1.5"]);
    // No history yet, so the threshold is never used
    assert!(bad_threshold.status.success());

    let bad_config = dir.path().join("regwatch.toml");
    fs::write(&bad_config, "[diff]\nthreshold = 0\n").unwrap();
    let output = run(&dir, &["stats"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_CONFIG"));
}
