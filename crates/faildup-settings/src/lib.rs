//! # faildup-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Clap-free settings for the analyze operation, and the schema of the
//! `faildup.toml` config file. These types mirror CLI arguments without Clap
//! dependencies, so library consumers can drive `faildup-core` directly.
//!
//! ## What belongs here
//! * Pure data types with Serde derive
//! * Default values and validation
//! * TOML config file schema
//!
//! ## What does NOT belong here
//! * Clap parsing (use faildup-config)
//! * Config file discovery (the CLI crate does that)
//! * Business logic

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use faildup_types::ReportFormat;

/// Minimum similarity for two failures to be linked when none is given.
pub const DEFAULT_THRESHOLD: f64 = 0.80;

/// Report file glob used when no pattern is given.
pub const DEFAULT_PATTERN: &str = "*.xml";

/// Settings for one analysis (`faildup analyze`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeSettings {
    /// Directory to search for test reports.
    pub path: String,

    /// Minimum cosine similarity for a direct link, in `[0, 1]`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Emit one representative per group instead of every failure.
    #[serde(default)]
    pub drain: bool,

    /// Output format.
    #[serde(default)]
    pub format: ReportFormat,

    /// Write the rendered report here instead of stdout.
    #[serde(default)]
    pub out: Option<String>,

    /// Report file globs.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_patterns() -> Vec<String> {
    vec![DEFAULT_PATTERN.to_string()]
}

impl Default for AnalyzeSettings {
    fn default() -> Self {
        Self {
            path: ".".to_string(),
            threshold: default_threshold(),
            drain: false,
            format: ReportFormat::default(),
            out: None,
            patterns: default_patterns(),
        }
    }
}

impl AnalyzeSettings {
    /// Settings for analyzing reports under `path` with defaults.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Check value ranges. Glob syntax is checked where patterns are compiled.
    pub fn validate(&self) -> Result<(), String> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "threshold must be between 0.0 and 1.0, got {}",
                self.threshold
            ));
        }
        if self.path.trim().is_empty() {
            return Err("path must not be empty".to_string());
        }
        if self.patterns.iter().any(|p| p.trim().is_empty()) {
            return Err("report patterns must not be empty".to_string());
        }
        Ok(())
    }

    /// Patterns to search with; an empty list means the default.
    pub fn effective_patterns(&self) -> Vec<String> {
        if self.patterns.is_empty() {
            default_patterns()
        } else {
            self.patterns.clone()
        }
    }
}

// ============================================================
// Config file schema
// ============================================================

/// Root of a `faildup.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Analyze command settings.
    pub analyze: AnalyzeConfig,
}

/// `[analyze]` table. Every key is optional; unset keys fall through to the
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub threshold: Option<f64>,
    pub drain: Option<bool>,
    pub format: Option<ReportFormat>,
    pub out: Option<String>,
    pub patterns: Option<Vec<String>>,
}

impl TomlConfig {
    /// Load configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load configuration from a file path.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
