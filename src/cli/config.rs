use anyhow::{Context, Result};

use crate::cli::flags::{Cli, Command};
use crate::config::{load_config, AppConfig};

/// Load the config file and fold in per-command flag overrides.
pub fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let cfg = load_config(cli.config.as_deref()).with_context(|| {
        format!(
            "loading config {}",
            cli.config.as_deref().unwrap_or(crate::config::DEFAULT_CONFIG_PATH)
        )
    })?;
    Ok(match &cli.command {
        Command::Scan {
            strict, timeout_ms, ..
        } => apply_overrides(cfg, *strict, *timeout_ms),
        Command::Tui { strict, .. } => apply_overrides(cfg, *strict, None),
        Command::Tables => cfg,
    })
}

pub fn apply_overrides(mut cfg: AppConfig, strict: bool, timeout_ms: Option<u64>) -> AppConfig {
    if strict {
        cfg.scoring.strict.enable_all();
    }
    if let Some(ms) = timeout_ms {
        cfg.forensics.timeout_ms = ms;
    }
    cfg
}
