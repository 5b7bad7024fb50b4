pub(crate) mod analyze;
pub(crate) mod completions;

use anyhow::Result;
use faildup_config as cli;

use crate::config::ResolvedConfig;

pub(crate) fn dispatch(cli: cli::Cli, resolved: &ResolvedConfig) -> Result<()> {
    match cli
        .command
        .unwrap_or(cli::Commands::Analyze(cli.analyze.clone()))
    {
        cli::Commands::Completions(args) => completions::handle(args),
        cli::Commands::Analyze(args) => analyze::handle(args, resolved),
    }
}
