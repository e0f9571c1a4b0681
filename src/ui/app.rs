use std::fmt;

use chrono::Local;

use crate::core::scanner::Scanner;
use crate::core::verdict::ScanResult;
use crate::modules::forensics::ForensicReport;

#[derive(Clone, Debug, PartialEq)]
pub enum ForensicState {
    Disabled,
    Fetching,
    Done(ForensicReport),
}

impl fmt::Display for ForensicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForensicState::Disabled => write!(f, "off (start with --forensics)"),
            ForensicState::Fetching => write!(f, "Fetching..."),
            ForensicState::Done(ForensicReport::Success(_)) => write!(f, "done"),
            ForensicState::Done(ForensicReport::Error { message }) => {
                write!(f, "failed: {}", message)
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Entry {
    pub input: String,
    pub result: ScanResult,
    pub forensics: ForensicState,
}

pub struct App {
    pub entries: Vec<Entry>,
    pub selected: usize,
    pub input: String,
    pub logs: Vec<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            entries: vec![],
            selected: 0,
            input: String::new(),
            logs: vec![
                "[SYSTEM] LINK-GUARD BOOT".to_string(),
                "[SYSTEM] THREAT TABLES LOADED".to_string(),
                "[SYSTEM] PASTE A LINK AND PRESS ENTER".to_string(),
            ],
        }
    }

    /// Scores the current input, selects it, and returns its index.
    pub fn submit(&mut self, scanner: &Scanner, fetching: bool) -> Option<usize> {
        let raw = self.input.trim().to_string();
        self.input.clear();
        if raw.is_empty() {
            return None;
        }
        let result = scanner.scan(&raw);
        self.log(format!(
            "{} -> {} ({} findings)",
            raw,
            result.score,
            result.findings.len()
        ));
        self.entries.push(Entry {
            input: raw,
            result,
            forensics: if fetching {
                ForensicState::Fetching
            } else {
                ForensicState::Disabled
            },
        });
        self.selected = self.entries.len() - 1;
        Some(self.selected)
    }

    pub fn complete_forensics(&mut self, idx: usize, report: ForensicReport) {
        if let Some(entry) = self.entries.get_mut(idx) {
            let line = match &report {
                ForensicReport::Success(d) => format!(
                    "forensics {}: HTTP {} via {} hop(s)",
                    entry.input,
                    d.http_status_code,
                    d.redirect_chain.len()
                ),
                ForensicReport::Error { message } => {
                    format!("forensics {} failed: {}", entry.input, message)
                }
            };
            entry.forensics = ForensicState::Done(report);
            self.log(line);
        }
    }

    pub fn current(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    pub fn next_entry(&mut self) {
        self.selected = (self.selected + 1) % self.entries.len().max(1);
    }

    pub fn log(&mut self, msg: impl Into<String>) {
        self.logs
            .push(format!("[{}] {}", Local::now().format("%H:%M:%S"), msg.into()));
        if self.logs.len() > 10 {
            self.logs.remove(0);
        }
    }
}
