//! # faildup-format
//!
//! **Tier 3 (Formatting)**
//!
//! Renders a `GroupReport` as a Markdown table, plain text, or a JSON
//! receipt, and writes the result to stdout or a file.
//!
//! ## What belongs here
//! * Markdown and text rendering
//! * Receipt envelope construction and serialization
//! * Output writing
//!
//! ## What does NOT belong here
//! * Scoring or grouping
//! * CLI arg parsing

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use faildup_types::{
    AnalysisReceipt, GroupReport, GroupedFailure, ReportFormat, SCHEMA_VERSION, ScanMeta, ToolInfo,
};

/// Longest Markdown message cell, in characters.
pub const MAX_HEADLINE_CHARS: usize = 120;

/// Printed instead of a report when nothing failed.
pub const NO_FAILURES_MESSAGE: &str = "NO FAILURES FOUND";

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

fn summary_line(report: &GroupReport) -> String {
    format!(
        "{} failures in {} groups (threshold {:.2}, duplicate ratio {:.4})",
        report.total_failures,
        report.group_count(),
        report.threshold,
        report.duplicate_ratio
    )
}

fn group_size(report: &GroupReport, entry: &GroupedFailure) -> usize {
    report.group(entry.group).map(|g| g.size).unwrap_or(1)
}

/// One-line summary of a failure message for table cells.
///
/// Uses the last non-blank line, where assertion frameworks put the error
/// type, escapes pipes and truncates to [`MAX_HEADLINE_CHARS`].
pub fn headline(message: &str) -> String {
    let line = message
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    let escaped = line.replace('|', "\\|");
    if escaped.chars().count() <= MAX_HEADLINE_CHARS {
        return escaped;
    }
    let mut cut: String = escaped.chars().take(MAX_HEADLINE_CHARS - 3).collect();
    // Never leave a dangling escape
    if cut.ends_with('\\') {
        cut.pop();
    }
    cut.push_str("...");
    cut
}

fn md_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

// -----------------------
// Markdown
// -----------------------

pub fn render_md(report: &GroupReport) -> String {
    let mut s = String::new();
    s.push_str("## Failure groups\n\n");
    s.push_str(&summary_line(report));
    s.push('\n');
    if report.drain {
        s.push_str("\nShowing one representative per group.\n");
    }
    s.push('\n');
    s.push_str("|Group|Size|Test|Class|File|Message|\n");
    s.push_str("|---:|---:|---|---|---|---|\n");
    for e in &report.entries {
        s.push_str(&format!(
            "|{}|{}|{}|{}|{}|{}|\n",
            e.group,
            group_size(report, e),
            md_cell(&e.record.test_name),
            md_cell(&e.record.class_name),
            md_cell(&e.record.file_name),
            headline(&e.record.message)
        ));
    }
    s
}

// -----------------------
// Plain text
// -----------------------

/// Text report with full failure messages, indented under their group.
pub fn render_text(report: &GroupReport) -> String {
    let mut s = String::new();
    s.push_str(&format!("Found {}\n", summary_line(report)));

    let mut current = 0;
    for e in &report.entries {
        if e.group != current {
            current = e.group;
            if let Some(g) = report.group(current) {
                s.push_str(&format!(
                    "\nGroup {} ({} failures, max similarity {:.4}, signature {})\n",
                    g.id, g.size, g.max_similarity, g.signature
                ));
            }
        }
        let owner = if e.record.class_name.is_empty() {
            e.record.test_name.clone()
        } else {
            format!("{}::{}", e.record.class_name, e.record.test_name)
        };
        s.push_str(&format!("  [{}] {} ({})\n", e.index, owner, e.record.file_name));
        for line in e.record.message.lines() {
            s.push_str("      ");
            s.push_str(line);
            s.push('\n');
        }
    }
    s
}

// -----------------------
// JSON receipt
// -----------------------

pub fn build_receipt(report: &GroupReport, scan: ScanMeta, warnings: Vec<String>) -> AnalysisReceipt {
    AnalysisReceipt {
        schema_version: SCHEMA_VERSION,
        generated_at_ms: now_ms(),
        tool: ToolInfo::current(),
        mode: "analyze".to_string(),
        warnings,
        scan,
        report: report.clone(),
    }
}

pub fn render_json(receipt: &AnalysisReceipt) -> Result<String> {
    let mut json = serde_json::to_string_pretty(receipt)?;
    json.push('\n');
    Ok(json)
}

/// Render `report` in `format`. Scan metadata and warnings only show up in
/// the JSON receipt.
pub fn render(
    report: &GroupReport,
    format: ReportFormat,
    scan: &ScanMeta,
    warnings: &[String],
) -> Result<String> {
    match format {
        ReportFormat::Md => Ok(render_md(report)),
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => render_json(&build_receipt(report, scan.clone(), warnings.to_vec())),
    }
}

// -----------------------
// Output
// -----------------------

/// Write rendered output to `out`, or stdout when `None`.
pub fn write_output(rendered: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut w = BufWriter::new(file);
            w.write_all(rendered.as_bytes())?;
            w.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(rendered.as_bytes())?;
            lock.flush()?;
        }
    }
    Ok(())
}
