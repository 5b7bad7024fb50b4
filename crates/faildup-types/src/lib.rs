//! # faildup-types
//!
//! **Tier 0 (Core Types)**
//!
//! This crate defines the core data structures and contracts for `faildup`.
//! It contains only data types, Serde definitions, and `SCHEMA_VERSION`.
//!
//! ## What belongs here
//! * Failure records and the parallel-column `FailureSet`
//! * Groups, report entries, and the `Outcome` of an analysis
//! * Receipt envelopes and stability markers (`SCHEMA_VERSION`)
//!
//! ## What does NOT belong here
//! * File I/O
//! * CLI argument parsing
//! * Scoring or grouping logic

use std::fmt;

use serde::{Deserialize, Serialize};

/// The current schema version for analysis receipts.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "faildup".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// One failing test case: the failure text plus identifying metadata.
///
/// Only `message` takes part in similarity scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureRecord {
    pub message: String,
    pub test_name: String,
    pub file_name: String,
    pub class_name: String,
}

impl FailureRecord {
    pub fn new(
        message: impl Into<String>,
        test_name: impl Into<String>,
        file_name: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            test_name: test_name.into(),
            file_name: file_name.into(),
            class_name: class_name.into(),
        }
    }
}

/// Returned by [`FailureSet::from_columns`] when the columns disagree in length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMismatch {
    pub messages: usize,
    pub test_names: usize,
    pub file_names: usize,
    pub class_names: usize,
}

impl fmt::Display for ColumnMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failure columns differ in length (messages={}, test_names={}, file_names={}, class_names={})",
            self.messages, self.test_names, self.file_names, self.class_names
        )
    }
}

impl std::error::Error for ColumnMismatch {}

/// Failures as four parallel ordered sequences, one entry per failing test.
///
/// Order is extraction order. The columns always have equal length, including
/// after deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "FailureColumns")]
pub struct FailureSet {
    messages: Vec<String>,
    test_names: Vec<String>,
    file_names: Vec<String>,
    class_names: Vec<String>,
}

#[derive(Deserialize)]
struct FailureColumns {
    messages: Vec<String>,
    test_names: Vec<String>,
    file_names: Vec<String>,
    class_names: Vec<String>,
}

impl TryFrom<FailureColumns> for FailureSet {
    type Error = ColumnMismatch;

    fn try_from(c: FailureColumns) -> Result<Self, Self::Error> {
        FailureSet::from_columns(c.messages, c.test_names, c.file_names, c.class_names)
    }
}

impl FailureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(
        messages: Vec<String>,
        test_names: Vec<String>,
        file_names: Vec<String>,
        class_names: Vec<String>,
    ) -> Result<Self, ColumnMismatch> {
        let n = messages.len();
        if test_names.len() != n || file_names.len() != n || class_names.len() != n {
            return Err(ColumnMismatch {
                messages: n,
                test_names: test_names.len(),
                file_names: file_names.len(),
                class_names: class_names.len(),
            });
        }
        Ok(Self {
            messages,
            test_names,
            file_names,
            class_names,
        })
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = FailureRecord>,
    {
        let mut set = Self::new();
        for record in records {
            set.push(record);
        }
        set
    }

    pub fn push(&mut self, record: FailureRecord) {
        self.messages.push(record.message);
        self.test_names.push(record.test_name);
        self.file_names.push(record.file_name);
        self.class_names.push(record.class_name);
    }

    pub fn extend(&mut self, other: FailureSet) {
        self.messages.extend(other.messages);
        self.test_names.extend(other.test_names);
        self.file_names.extend(other.file_names);
        self.class_names.extend(other.class_names);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn test_names(&self) -> &[String] {
        &self.test_names
    }

    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Materialize the record at `index`, if any.
    pub fn record(&self, index: usize) -> Option<FailureRecord> {
        Some(FailureRecord {
            message: self.messages.get(index)?.clone(),
            test_name: self.test_names.get(index)?.clone(),
            file_name: self.file_names.get(index)?.clone(),
            class_name: self.class_names.get(index)?.clone(),
        })
    }

    pub fn records(&self) -> Vec<FailureRecord> {
        (0..self.len()).filter_map(|i| self.record(i)).collect()
    }
}

/// A maximal set of failures connected by similarity links at or above the
/// threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureGroup {
    /// 1-based, assigned in order of each group's first member.
    pub id: usize,
    /// Failure indices, ascending.
    pub members: Vec<usize>,
    /// Index of the first member in original order.
    pub representative: usize,
    pub size: usize,
    /// Highest direct link score inside the group; 0.0 for singletons.
    pub max_similarity: f64,
    /// Short digest of the representative message, stable across runs.
    pub signature: String,
}

/// One rendered report entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupedFailure {
    pub group: usize,
    pub index: usize,
    #[serde(flatten)]
    pub record: FailureRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupReport {
    pub threshold: f64,
    pub drain: bool,
    pub total_failures: usize,
    /// Share of failures that collapsed into another failure's group.
    pub duplicate_ratio: f64,
    pub groups: Vec<FailureGroup>,
    pub entries: Vec<GroupedFailure>,
}

impl GroupReport {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group(&self, id: usize) -> Option<&FailureGroup> {
        self.groups.iter().find(|g| g.id == id)
    }
}

/// Result of analyzing a failure set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing failed; there is nothing to group.
    NoFailures,
    Report(GroupReport),
}

impl Outcome {
    pub fn report(&self) -> Option<&GroupReport> {
        match self {
            Outcome::NoFailures => None,
            Outcome::Report(report) => Some(report),
        }
    }

    pub fn is_no_failures(&self) -> bool {
        matches!(self, Outcome::NoFailures)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Markdown table (paste into a PR or issue).
    #[default]
    Md,
    /// Plain text with full failure messages.
    Text,
    /// JSON receipt.
    Json,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Md => "md",
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
        }
    }
}

/// Where the failures came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanMeta {
    pub path: String,
    pub patterns: Vec<String>,
    pub reports_scanned: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReceipt {
    pub schema_version: u32,
    pub generated_at_ms: u128,
    pub tool: ToolInfo,
    pub mode: String, // "analyze"
    pub warnings: Vec<String>,
    pub scan: ScanMeta,
    pub report: GroupReport,
}
