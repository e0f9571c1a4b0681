use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::core::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "link-guard",
    version,
    about = "Zero-trust phishing and malware link scorer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML). Default: config/linkguard.toml
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Increase verbosity (debug, trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log file path
    #[arg(long, default_value = "data/linkguard.log", global = true)]
    pub log_file: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one or more links
    Scan {
        /// Links to score (schema optional)
        #[arg(required = true)]
        urls: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormatArg,
        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also fetch each link live (redirects, server, title)
        #[arg(long)]
        forensics: bool,
        /// Override the forensic fetch timeout
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Enable the legacy strict heuristics
        #[arg(long)]
        strict: bool,
    },
    /// Interactive terminal scanner
    Tui {
        /// Fetch each scanned link live
        #[arg(long)]
        forensics: bool,
        /// Enable the legacy strict heuristics
        #[arg(long)]
        strict: bool,
    },
    /// Print the effective threat tables as JSON
    Tables,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Text,
    Json,
    Jsonl,
    Markdown,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Jsonl => OutputFormat::Jsonl,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}
