use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::cli::config::resolve_config;
use crate::cli::flags::{Cli, Command};
use crate::config::{AppConfig, ForensicsConfig};
use crate::core::output::{render_reports, write_reports, OutputFormat, ScanReport};
use crate::core::scanner::Scanner;
use crate::modules::forensics::{fetch_forensics, ForensicReport};
use crate::ui::terminal::run_tui;

pub async fn run(cli: Cli) -> Result<()> {
    let cfg = resolve_config(&cli)?;
    let scanner = Arc::new(Scanner::from_config(&cfg));

    match cli.command {
        Command::Scan {
            urls,
            format,
            output,
            forensics,
            ..
        } => {
            let reports = run_scan(&scanner, &cfg, &urls, forensics).await?;
            emit(&reports, format.into(), output.as_deref())
        }
        Command::Tui { forensics, .. } => {
            let fetch_cfg = forensics.then(|| cfg.forensics.clone());
            run_tui(scanner, fetch_cfg)
                .await
                .context("terminal front end failed")
        }
        Command::Tables => {
            let json = serde_json::to_string_pretty(scanner.tables())
                .context("serializing threat tables")?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Score every link; with `forensics`, fetch them all concurrently alongside.
pub async fn run_scan(
    scanner: &Scanner,
    cfg: &AppConfig,
    urls: &[String],
    forensics: bool,
) -> Result<Vec<ScanReport>> {
    let fetches: Vec<Option<JoinHandle<ForensicReport>>> = urls
        .iter()
        .map(|url| forensics.then(|| spawn_fetch(url.clone(), cfg.forensics.clone())))
        .collect();

    let mut reports = Vec::with_capacity(urls.len());
    for (url, fetch) in urls.iter().zip(fetches) {
        let mut report = ScanReport::new(url.clone(), scanner.scan(url));
        if let Some(handle) = fetch {
            let forensic = match handle.await {
                Ok(report) => report,
                Err(join_err) => ForensicReport::Error {
                    message: join_err.to_string(),
                },
            };
            report = report.with_forensics(forensic);
        }
        tracing::info!("{} scored {} ({})", url, report.score, report.risk_level);
        reports.push(report);
    }
    Ok(reports)
}

fn spawn_fetch(url: String, cfg: ForensicsConfig) -> JoinHandle<ForensicReport> {
    tokio::spawn(async move { fetch_forensics(&url, &cfg).await })
}

fn emit(reports: &[ScanReport], format: OutputFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_reports(reports, format, path)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!("report written to {}", path.display());
        }
        None => print!("{}", render_reports(reports, format)?),
    }
    Ok(())
}
