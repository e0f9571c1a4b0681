use std::fmt;

use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 100;

/// Which check produced a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Malformed,
    FreeHosting,
    UrlShortener,
    BrandClone,
    BrandKeyword,
    SuspiciousTld,
    IpHost,
    MaliciousFile,
    AtSymbol,
    PanicWords,
    SubdomainDepth,
    UrlLength,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub rule: RuleKind,
    pub message: String,
}

impl Finding {
    pub fn new(rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanResult {
    pub score: u8,
    /// In rule-evaluation order, not severity order.
    pub findings: Vec<Finding>,
}

impl ScanResult {
    pub fn malformed() -> Self {
        Self {
            score: MAX_SCORE,
            findings: vec![Finding::new(RuleKind::Malformed, "URL is malformed or invalid")],
        }
    }

    pub fn has(&self, rule: RuleKind) -> bool {
        self.findings.iter().any(|f| f.rule == rule)
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Dangerous,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=30 => RiskLevel::Safe,
            31..=75 => RiskLevel::Suspicious,
            _ => RiskLevel::Dangerous,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE TO OPEN",
            RiskLevel::Suspicious => "SUSPICIOUS",
            RiskLevel::Dangerous => "DANGEROUS LINK",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "No threats detected.",
            RiskLevel::Suspicious => "Proceed with extreme caution.",
            RiskLevel::Dangerous => "Do not open this. It is confirmed phishing or malware.",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline())
    }
}
