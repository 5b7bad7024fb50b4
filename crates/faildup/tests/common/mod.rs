//! Shared test utilities for faildup integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Checked-in report fixtures.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
}

/// Copy the named fixtures into `dst`.
pub fn copy_fixtures(dst: &Path, names: &[&str]) {
    for name in names {
        std::fs::copy(data_dir().join(name), dst.join(name)).expect("copy fixture");
    }
}

/// The binary, isolated from any user-level config file.
///
/// Runs in `cwd` so a stray `faildup.toml` in the repository is never picked
/// up.
pub fn faildup_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_faildup"));
    cmd.current_dir(cwd)
        .env("XDG_CONFIG_HOME", cwd)
        .env("HOME", cwd)
        .env_remove("RUST_LOG");
    cmd
}

/// Markdown table rows (skipping header and separator).
pub fn md_rows(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .filter(|l| l.starts_with('|') && !l.starts_with("|Group") && !l.starts_with("|---"))
        .collect()
}
