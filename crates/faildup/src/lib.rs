//! # faildup
//!
//! **CLI Binary**
//!
//! This is the entry point for the `faildup` command-line application.
//! It orchestrates the other crates to perform the requested actions.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Load configuration
//! * Initialize logging
//! * Dispatch commands to appropriate handlers
//! * Handle errors and exit codes
//!
//! This crate should contain minimal business logic.

mod commands;
mod config;
mod error_hints;
mod logging;

use anyhow::Result;
use clap::Parser;

use faildup_config::Cli;

pub use config::resolve_analyze;

/// Entry point used by the `faildup` binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    let resolved = config::load_config(cli.global.config.as_deref())?;
    if let Some(path) = &resolved.source {
        tracing::debug!(config = %path.display(), "loaded config file");
    }

    commands::dispatch(cli, &resolved)
}

/// Render an error with its cause chain and any matching hints.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}
