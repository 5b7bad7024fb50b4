//! # faildup-walk
//!
//! **Tier 2 (Utilities)**
//!
//! Report discovery. Walks a directory tree and returns the files whose name
//! or relative path matches one of the report glob patterns.
//!
//! ## What belongs here
//! * Filesystem traversal
//! * Report pattern matching
//!
//! ## What does NOT belong here
//! * Report parsing (use faildup-junit)
//! * File modification

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

/// Default report pattern: any XML file.
pub const DEFAULT_REPORT_PATTERN: &str = "*.xml";

/// Compile report patterns into a glob set.
///
/// An empty slice falls back to [`DEFAULT_REPORT_PATTERN`].
pub fn build_matcher(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    if patterns.is_empty() {
        builder.add(Glob::new(DEFAULT_REPORT_PATTERN)?);
    }
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid report pattern: {pattern}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// List report files under `root` matching `patterns`, sorted by path.
///
/// Traversal is recursive and does not follow symlinks. Ignore files are not
/// honored since reports usually live in ignored build directories. Only
/// regular files are returned, so a directory named `reports.xml` is skipped.
pub fn list_reports(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        bail!("Path not found: {}", root.display());
    }
    if !root.is_dir() {
        bail!("Not a directory: {}", root.display());
    }

    let matcher = build_matcher(patterns)?;

    let mut files: Vec<PathBuf> = Vec::new();
    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false);
    builder.follow_links(false);

    for entry in builder.build() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if is_report(&matcher, root, path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    Ok(files)
}

fn is_report(matcher: &GlobSet, root: &Path, path: &Path) -> bool {
    let by_name = path
        .file_name()
        .map(|name| matcher.is_match(name))
        .unwrap_or(false);
    if by_name {
        return true;
    }
    let rel = path.strip_prefix(root).unwrap_or(path);
    matcher.is_match(rel)
}
