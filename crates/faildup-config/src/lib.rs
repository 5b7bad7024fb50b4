//! # faildup-config
//!
//! **Tier 4 (Configuration)**
//!
//! Clap definitions for the `faildup` command line.
//!
//! ## What belongs here
//! * Clap `Parser`, `Args`, `Subcommand` structs
//! * Value parsers and CLI enums
//!
//! ## What does NOT belong here
//! * Business logic
//! * Config file discovery and merging (the CLI crate does that)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

pub use faildup_settings::{AnalyzeConfig, TomlConfig};
pub use faildup_types::ReportFormat;

/// `faildup` groups failing tests from JUnit/xUnit XML reports by how similar
/// their failure messages are.
///
/// Default mode (no subcommand) runs `analyze`.
#[derive(Parser, Debug)]
#[command(name = "faildup", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Options for the implicit `analyze` mode (when no subcommand is provided).
    #[command(flatten)]
    pub analyze: CliAnalyzeArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Verbose output (repeat for more detail).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to load instead of `faildup.toml` discovery.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Group failures found in test reports (default).
    Analyze(CliAnalyzeArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CliAnalyzeArgs {
    /// Directory to search for test reports. Defaults to "."
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Minimum similarity (0.0 to 1.0) for two failures to be linked [default: 0.80].
    #[arg(short = 't', long, value_parser = parse_threshold)]
    pub threshold: Option<f64>,

    /// Write the report to this file instead of stdout.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Show one representative per group.
    #[arg(long, overrides_with = "no_drain")]
    pub drain: bool,

    /// Show every failure, even when the config file enables drain.
    #[arg(long = "no-drain", overrides_with = "drain")]
    pub no_drain: bool,

    /// Output format [default: md].
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Report file glob. Repeatable [default: *.xml].
    #[arg(long = "pattern", value_name = "GLOB")]
    pub patterns: Vec<String>,
}

impl CliAnalyzeArgs {
    /// `Some(true)` for `--drain`, `Some(false)` for `--no-drain`, `None` when
    /// neither was given.
    pub fn drain_flag(&self) -> Option<bool> {
        match (self.drain, self.no_drain) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    Powershell,
    Zsh,
}

/// Parse a similarity threshold in `[0, 1]`.
pub fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{s}` is not a number"))?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(format!("threshold must be between 0.0 and 1.0, got {s}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_threshold_bounds() {
        assert_eq!(parse_threshold("0.8"), Ok(0.8));
        assert_eq!(parse_threshold("0"), Ok(0.0));
        assert_eq!(parse_threshold("1"), Ok(1.0));
        assert!(parse_threshold("1.5").is_err());
        assert!(parse_threshold("-0.1").is_err());
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("high").unwrap_err().contains("not a number"));
    }

    #[test]
    fn drain_flag_is_tristate() {
        let mut args = CliAnalyzeArgs::default();
        assert_eq!(args.drain_flag(), None);
        args.no_drain = true;
        assert_eq!(args.drain_flag(), Some(false));
        args.drain = true;
        assert_eq!(args.drain_flag(), Some(true));
    }
}
