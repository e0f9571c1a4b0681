use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use crossterm::style::{Color, Stylize};
use serde::{Deserialize, Serialize};

use crate::core::error::LinkGuardError;
use crate::core::verdict::{Finding, RiskLevel, ScanResult};
use crate::modules::forensics::ForensicReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
    Jsonl,
    Markdown,
}

/// One scanned link, as handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanReport {
    pub input: String,
    pub scanned_at: DateTime<Utc>,
    pub score: u8,
    pub risk_level: RiskLevel,
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forensics: Option<ForensicReport>,
}

impl ScanReport {
    pub fn new(input: impl Into<String>, result: ScanResult) -> Self {
        Self {
            input: input.into(),
            scanned_at: Utc::now(),
            score: result.score,
            risk_level: result.risk_level(),
            findings: result.findings,
            forensics: None,
        }
    }

    pub fn with_forensics(mut self, report: ForensicReport) -> Self {
        self.forensics = Some(report);
        self
    }
}

pub fn render_reports(
    reports: &[ScanReport],
    format: OutputFormat,
) -> Result<String, LinkGuardError> {
    match format {
        OutputFormat::Text => Ok(render_text(reports)),
        OutputFormat::Json => {
            let mut pretty = serde_json::to_string_pretty(reports)?;
            pretty.push('\n');
            Ok(pretty)
        }
        OutputFormat::Jsonl => render_jsonl(reports),
        OutputFormat::Markdown => Ok(render_markdown(reports)),
    }
}

pub fn write_reports(
    reports: &[ScanReport],
    format: OutputFormat,
    path: &Path,
) -> Result<(), LinkGuardError> {
    let rendered = render_reports(reports, format)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, rendered)?;
    Ok(())
}

pub fn risk_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Safe => Color::Green,
        RiskLevel::Suspicious => Color::Yellow,
        RiskLevel::Dangerous => Color::Red,
    }
}

fn render_jsonl(reports: &[ScanReport]) -> Result<String, LinkGuardError> {
    let mut lines = String::new();
    for report in reports {
        let json = serde_json::to_string(report)?;
        lines.push_str(&json);
        lines.push('\n');
    }
    Ok(lines)
}

fn render_text(reports: &[ScanReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let color = risk_color(report.risk_level);
        let _ = writeln!(out, "{}", report.input.as_str().bold());
        let _ = writeln!(
            out,
            "  Score: {} => {}",
            format!("{:>3}", report.score).with(color).bold(),
            report.risk_level.headline().with(color)
        );
        let _ = writeln!(out, "  {}", report.risk_level.advice());
        if report.findings.is_empty() {
            let _ = writeln!(out, "  Findings: none");
        } else {
            let _ = writeln!(out, "  Findings:");
            for finding in &report.findings {
                let _ = writeln!(out, "    - {}", finding.message);
            }
        }
        if let Some(forensics) = &report.forensics {
            write_forensics_text(&mut out, forensics);
        }
        out.push('\n');
    }
    out
}

fn write_forensics_text(out: &mut String, report: &ForensicReport) {
    match report {
        ForensicReport::Success(d) => {
            let _ = writeln!(out, "  Forensics:");
            let _ = writeln!(out, "    Status:  {}", d.http_status_code);
            let _ = writeln!(out, "    Final:   {}", d.final_url);
            let _ = writeln!(out, "    Server:  {}", d.server_header);
            let _ = writeln!(out, "    Title:   {}", d.page_title);
            let _ = writeln!(out, "    Chain:   {}", d.redirect_chain.join(" -> "));
        }
        ForensicReport::Error { message } => {
            let _ = writeln!(out, "  Forensics: {}", format!("unavailable ({})", message).dark_grey());
        }
    }
}

fn render_markdown(reports: &[ScanReport]) -> String {
    let mut out = String::from("# Link-Guard Report\n\n");
    for report in reports {
        let _ = writeln!(out, "## `{}`\n", report.input);
        let _ = writeln!(
            out,
            "- **Score:** {} / 100 ({})",
            report.score,
            report.risk_level.headline()
        );
        let _ = writeln!(out, "- **Scanned:** {}\n", report.scanned_at.to_rfc3339());
        if report.findings.is_empty() {
            out.push_str("No threats detected.\n\n");
        } else {
            out.push_str("### Findings\n\n");
            for finding in &report.findings {
                let _ = writeln!(out, "- {}", finding.message);
            }
            out.push('\n');
        }
        match &report.forensics {
            Some(ForensicReport::Success(d)) => {
                out.push_str("### Forensics\n\n");
                let _ = writeln!(out, "| Field | Value |\n|---|---|");
                let _ = writeln!(out, "| HTTP status | {} |", d.http_status_code);
                let _ = writeln!(out, "| Final URL | {} |", d.final_url);
                let _ = writeln!(out, "| Server | {} |", d.server_header);
                let _ = writeln!(out, "| Title | {} |", d.page_title.replace('|', "\\|"));
                let _ = writeln!(out, "| Redirects | {} |\n", d.redirect_chain.join(" → "));
            }
            Some(ForensicReport::Error { message }) => {
                let _ = writeln!(out, "_Forensic fetch failed: {}_\n", message);
            }
            None => {}
        }
    }
    out
}
