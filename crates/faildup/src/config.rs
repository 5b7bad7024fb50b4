use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use faildup_config::{AnalyzeConfig, CliAnalyzeArgs, TomlConfig};
use faildup_settings::{AnalyzeSettings, DEFAULT_PATTERN, DEFAULT_THRESHOLD};

/// Config file name looked up in the working directory.
pub(crate) const LOCAL_CONFIG: &str = "faildup.toml";

#[derive(Debug, Clone, Default)]
pub(crate) struct ResolvedConfig {
    pub toml: Option<TomlConfig>,
    /// Where `toml` came from.
    pub source: Option<PathBuf>,
}

impl ResolvedConfig {
    pub(crate) fn analyze(&self) -> Option<&AnalyzeConfig> {
        self.toml.as_ref().map(|c| &c.analyze)
    }
}

fn user_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("faildup").join("config.toml"))
}

/// First config file that exists: `explicit`, then `./faildup.toml`, then the
/// user config directory.
pub(crate) fn discover_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            bail!("Config file not found: {}", path.display());
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(user_config_path().filter(|p| p.is_file()))
}

pub(crate) fn load_config(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let Some(path) = discover_config_path(explicit)? else {
        return Ok(ResolvedConfig::default());
    };
    let toml = TomlConfig::from_file(&path)
        .with_context(|| format!("Failed to parse TOML config file {}", path.display()))?;
    Ok(ResolvedConfig {
        toml: Some(toml),
        source: Some(path),
    })
}

/// Merge CLI arguments over config file values over built-in defaults.
pub fn resolve_analyze(
    cli_args: &CliAnalyzeArgs,
    config: Option<&AnalyzeConfig>,
) -> AnalyzeSettings {
    AnalyzeSettings {
        path: cli_args
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ".".to_string()),
        threshold: cli_args
            .threshold
            .or_else(|| config.and_then(|c| c.threshold))
            .unwrap_or(DEFAULT_THRESHOLD),
        drain: cli_args
            .drain_flag()
            .or_else(|| config.and_then(|c| c.drain))
            .unwrap_or(false),
        format: cli_args
            .format
            .or_else(|| config.and_then(|c| c.format))
            .unwrap_or_default(),
        out: cli_args
            .out
            .as_ref()
            .map(|p| p.display().to_string())
            .or_else(|| config.and_then(|c| c.out.clone())),
        patterns: if !cli_args.patterns.is_empty() {
            cli_args.patterns.clone()
        } else {
            config
                .and_then(|c| c.patterns.clone())
                .unwrap_or_else(|| vec![DEFAULT_PATTERN.to_string()])
        },
    }
}
