//! # faildup-core
//!
//! This crate is the **primary library interface** for `faildup`.
//! It coordinates report discovery, failure extraction, similarity grouping
//! and rendering.
//!
//! If you are embedding `faildup` into another Rust application, depend on
//! this crate and `faildup-types`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use faildup_core::{RunStatus, run};
//! use faildup_core::settings::AnalyzeSettings;
//!
//! let settings = AnalyzeSettings::for_path("target/test-reports");
//! match run(&settings).expect("analysis failed") {
//!     RunStatus::NoFailures => {}
//!     RunStatus::Reported { groups, entries } => {
//!         eprintln!("{entries} failures shown in {groups} groups");
//!     }
//! }
//! ```

pub mod error;

use std::path::Path;

use tracing::{debug, info, warn};

pub use error::{ErrorCode, FaildupError};
pub use faildup_settings as settings;
pub use faildup_types as types;

use faildup_format::{NO_FAILURES_MESSAGE, render, write_output};
use faildup_grouping::{analyze_failures, check_partition};
use faildup_junit::collect_failures;
use faildup_settings::AnalyzeSettings;
use faildup_types::{FailureSet, Outcome, ScanMeta};

/// Everything one analysis produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub outcome: Outcome,
    pub scan: ScanMeta,
    /// Reports that were skipped, one line each.
    pub warnings: Vec<String>,
}

/// What [`run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Nothing failed; the no-failures message was printed.
    NoFailures,
    /// A report was rendered.
    Reported { groups: usize, entries: usize },
}

/// Normalize a path to forward slashes and strip leading `./` for
/// cross-platform stability.
fn normalize_scan_input(p: &Path) -> String {
    let s = p.display().to_string().replace('\\', "/");
    s.strip_prefix("./").unwrap_or(&s).to_string()
}

fn check_root(root: &Path, shown: &str) -> Result<(), FaildupError> {
    if !root.exists() {
        return Err(FaildupError::path_not_found(shown));
    }
    if !root.is_dir() {
        return Err(FaildupError::not_a_directory(shown));
    }
    Ok(())
}

/// Group an already-extracted set of failures.
///
/// Verifies the partition before returning; a broken one is an internal
/// error.
pub fn group_failure_set(
    failures: &FailureSet,
    threshold: f64,
    drain: bool,
) -> Result<Outcome, FaildupError> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(FaildupError::invalid_settings(format!(
            "threshold must be between 0.0 and 1.0, got {threshold}"
        )));
    }
    let outcome = analyze_failures(failures, threshold, drain);
    if let Outcome::Report(report) = &outcome {
        check_partition(&report.groups, failures.len()).map_err(FaildupError::internal)?;
    }
    Ok(outcome)
}

/// Group failures given as four parallel columns.
///
/// Columns of different lengths are a [`ErrorCode::ReportError`].
pub fn group_columns(
    messages: Vec<String>,
    test_names: Vec<String>,
    file_names: Vec<String>,
    class_names: Vec<String>,
    threshold: f64,
    drain: bool,
) -> Result<Outcome, FaildupError> {
    let failures = FailureSet::from_columns(messages, test_names, file_names, class_names)
        .map_err(FaildupError::report_error)?;
    group_failure_set(&failures, threshold, drain)
}

/// Discover reports, extract failures and group them.
///
/// Path problems are reported before any report is read.
pub fn analyze(settings: &AnalyzeSettings) -> Result<Analysis, FaildupError> {
    settings
        .validate()
        .map_err(FaildupError::invalid_settings)?;

    let root = Path::new(&settings.path);
    check_root(root, &settings.path)?;

    let patterns = settings.effective_patterns();
    faildup_walk::build_matcher(&patterns)
        .map_err(|e| FaildupError::invalid_settings(format!("{e:#}")))?;

    let reports = faildup_walk::list_reports(root, &patterns)
        .map_err(|e| FaildupError::io_error(format!("{e:#}")))?;
    debug!(count = reports.len(), path = %root.display(), "discovered reports");

    let extraction = collect_failures(&reports);
    if !extraction.warnings.is_empty() {
        warn!(
            skipped = extraction.warnings.len(),
            "some reports could not be read"
        );
    }
    info!(
        failures = extraction.failures.len(),
        reports = extraction.reports_scanned,
        "extracted failures"
    );

    let outcome = group_failure_set(&extraction.failures, settings.threshold, settings.drain)?;
    if let Some(report) = outcome.report() {
        info!(
            groups = report.group_count(),
            entries = report.entries.len(),
            "grouped failures"
        );
    }

    Ok(Analysis {
        outcome,
        scan: ScanMeta {
            path: normalize_scan_input(root),
            patterns,
            reports_scanned: extraction.reports_scanned,
        },
        warnings: extraction.warnings,
    })
}

/// Analyze, render, and write the result.
///
/// With no failures the no-failures message goes to stdout and `out` is left
/// untouched.
pub fn run(settings: &AnalyzeSettings) -> Result<RunStatus, FaildupError> {
    let analysis = analyze(settings)?;

    let report = match &analysis.outcome {
        Outcome::NoFailures => {
            write_output(&format!("{NO_FAILURES_MESSAGE}\n"), None)
                .map_err(|e| FaildupError::io_error(format!("{e:#}")))?;
            return Ok(RunStatus::NoFailures);
        }
        Outcome::Report(report) => report,
    };

    let rendered = render(report, settings.format, &analysis.scan, &analysis.warnings)
        .map_err(FaildupError::from)?;
    let out = settings.out.as_deref().map(Path::new);
    write_output(&rendered, out).map_err(|e| FaildupError::io_error(format!("{e:#}")))?;
    if let Some(path) = out {
        info!(out = %path.display(), "wrote report");
    }

    Ok(RunStatus::Reported {
        groups: report.group_count(),
        entries: report.entries.len(),
    })
}
