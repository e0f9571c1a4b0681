use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use link_guard::cli::{
    commands,
    flags::{Cli, Command},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let console = !matches!(cli.command, Command::Tui { .. });
    init_tracing(&cli, console)?;
    commands::run(cli).await
}

fn init_tracing(cli: &Cli, console: bool) -> Result<()> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_path = Path::new(&cli.log_file);
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating log directory {}", parent.display()))?;
        }
    }
    if let Ok(meta) = fs::metadata(log_path) {
        if meta.len() > 1_000_000 {
            let rotated = log_path.with_extension("log.1");
            let _ = fs::rename(log_path, rotated);
        }
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(false);

    // stdout carries reports, so console logs go to stderr; the TUI owns the screen.
    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("initializing tracing")
}
