use anyhow::Result;
use faildup_config as cli;
use faildup_core::RunStatus;
use tracing::debug;

use crate::config::{self, ResolvedConfig};

pub(crate) fn handle(args: cli::CliAnalyzeArgs, resolved: &ResolvedConfig) -> Result<()> {
    let settings = config::resolve_analyze(&args, resolved.analyze());
    debug!(?settings, "resolved analyze settings");

    match faildup_core::run(&settings)? {
        RunStatus::NoFailures => debug!("no failures found"),
        RunStatus::Reported { groups, entries } => {
            debug!(groups, entries, "report written");
        }
    }
    Ok(())
}
