use tracing::{debug, info};

use crate::config::{AppConfig, ScoringConfig};
use crate::core::link::normalize;
use crate::core::rules::evaluate;
use crate::core::tables::ThreatTables;
use crate::core::verdict::ScanResult;

/// Entry point for scoring links. Holds the immutable tables and policy;
/// safe to share across threads and to call concurrently.
#[derive(Debug, Clone)]
pub struct Scanner {
    tables: ThreatTables,
    policy: ScoringConfig,
}

impl Scanner {
    pub fn new(tables: ThreatTables, policy: ScoringConfig) -> Self {
        Self { tables, policy }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(
            ThreatTables::from_config(&cfg.tables),
            cfg.scoring.clone(),
        )
    }

    pub fn tables(&self) -> &ThreatTables {
        &self.tables
    }

    pub fn policy(&self) -> &ScoringConfig {
        &self.policy
    }

    /// Score one raw link. Never fails: malformed input scores 100.
    pub fn scan(&self, raw: &str) -> ScanResult {
        let result = match normalize(raw) {
            Ok(link) => {
                debug!("scanning {} (domain {})", link.normalized_url, link.domain);
                evaluate(&link, &self.tables, &self.policy)
            }
            Err(err) => {
                debug!("rejecting input {:?}: {}", raw, err);
                ScanResult::malformed()
            }
        };
        info!(
            score = result.score,
            findings = result.findings.len(),
            "scan complete"
        );
        result
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ThreatTables::builtin(), ScoringConfig::default())
    }
}
