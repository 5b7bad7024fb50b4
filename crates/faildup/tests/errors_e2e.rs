//! E2E tests for CLI error handling and config file resolution.

mod common;

use std::fs;

use common::{copy_fixtures, data_dir, faildup_cmd, md_rows};
use predicates::prelude::*;
use tempfile::tempdir;

// ---------------------------------------------------------------------------
// Invalid input
// ---------------------------------------------------------------------------

#[test]
fn missing_path_fails_with_hint() {
    let cwd = tempdir().unwrap();
    faildup_cmd(cwd.path())
        .arg("not/here")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Path not found: not/here"))
        .stderr(predicate::str::contains("Hints:"));
}

#[test]
fn file_instead_of_directory_fails() {
    let cwd = tempdir().unwrap();
    faildup_cmd(cwd.path())
        .arg(data_dir().join("failing_01_.xml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn threshold_out_of_range_is_rejected() {
    let cwd = tempdir().unwrap();
    faildup_cmd(cwd.path())
        .arg(data_dir())
        .args(["--threshold", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}

#[test]
fn invalid_format_is_rejected() {
    let cwd = tempdir().unwrap();
    faildup_cmd(cwd.path())
        .arg(data_dir())
        .args(["--format", "html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'html'"));
}

#[test]
fn bad_glob_fails_with_hint() {
    let cwd = tempdir().unwrap();
    faildup_cmd(cwd.path())
        .arg(data_dir())
        .args(["--pattern", "[oops"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid report pattern"))
        .stderr(predicate::str::contains("TEST-*.xml"));
}

#[test]
fn unwritable_out_fails() {
    let cwd = tempdir().unwrap();
    faildup_cmd(cwd.path())
        .arg(data_dir())
        .arg("--out")
        .arg(cwd.path().join("missing/dir/out.md"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to create output file"));
}

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

#[test]
fn local_config_applies_when_cli_is_silent() {
    let cwd = tempdir().unwrap();
    fs::write(
        cwd.path().join("faildup.toml"),
        "[analyze]\ndrain = true\n",
    )
    .unwrap();

    let output = faildup_cmd(cwd.path()).arg(data_dir()).output().unwrap();
    assert!(output.status.success());
    assert_eq!(md_rows(&String::from_utf8_lossy(&output.stdout)).len(), 2);
}

#[test]
fn cli_flag_overrides_config() {
    let cwd = tempdir().unwrap();
    fs::write(
        cwd.path().join("faildup.toml"),
        "[analyze]\ndrain = true\nthreshold = 1.0\n",
    )
    .unwrap();

    let output = faildup_cmd(cwd.path())
        .arg(data_dir())
        .arg("--no-drain")
        .args(["--threshold", "0.8"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(md_rows(&stdout).len(), 4);
    assert!(stdout.contains("4 failures in 2 groups"));
}

#[test]
fn config_patterns_select_reports() {
    let cwd = tempdir().unwrap();
    let reports = tempdir().unwrap();
    copy_fixtures(reports.path(), &["failing_01_.xml", "failing_02_.xml"]);
    fs::write(
        cwd.path().join("faildup.toml"),
        "[analyze]\npatterns = [\"failing_01_*\"]\nformat = \"json\"\n",
    )
    .unwrap();

    let output = faildup_cmd(cwd.path())
        .arg(reports.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["scan"]["reports_scanned"], 1);
    assert_eq!(v["report"]["total_failures"], 2);
}

#[test]
fn explicit_config_flag_is_used() {
    let cwd = tempdir().unwrap();
    let cfg = cwd.path().join("ci.toml");
    fs::write(&cfg, "[analyze]\nformat = \"text\"\n").unwrap();

    faildup_cmd(cwd.path())
        .arg(data_dir())
        .arg("--config")
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Found 4 failures"));
}

#[test]
fn explicit_missing_config_fails() {
    let cwd = tempdir().unwrap();
    faildup_cmd(cwd.path())
        .arg(data_dir())
        .args(["--config", "nope.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"))
        .stderr(predicate::str::contains("--config"));
}

#[test]
fn malformed_config_fails_with_hint() {
    let cwd = tempdir().unwrap();
    fs::write(cwd.path().join("faildup.toml"), "[analyze\nthreshold = ").unwrap();

    faildup_cmd(cwd.path())
        .arg(data_dir())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse TOML config file"))
        .stderr(predicate::str::contains("[analyze]"));
}

#[test]
fn config_threshold_out_of_range_is_invalid_settings() {
    let cwd = tempdir().unwrap();
    fs::write(cwd.path().join("faildup.toml"), "[analyze]\nthreshold = 3.0\n").unwrap();

    faildup_cmd(cwd.path())
        .arg(data_dir())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid_settings"))
        .stderr(predicate::str::contains("--threshold"));
}
