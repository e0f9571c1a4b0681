use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::core::error::LinkGuardError;

pub const DEFAULT_CONFIG_PATH: &str = "config/linkguard.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub tables: TablesConfig,
    pub forensics: ForensicsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Brand checks only run while the running score is below this.
    pub guard_threshold: u32,
    /// Similarity must be strictly above this (and below 1.0) to flag a clone.
    pub clone_threshold: f64,
    pub weights: RuleWeights,
    pub strict: StrictRules,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            guard_threshold: 60,
            clone_threshold: 0.75,
            weights: RuleWeights::default(),
            strict: StrictRules::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleWeights {
    pub free_hosting: u32,
    pub url_shortener: u32,
    pub brand_clone: u32,
    pub brand_keyword: u32,
    pub suspicious_tld: u32,
    pub ip_host: u32,
    pub malicious_file: u32,
    pub at_symbol: u32,
    pub panic_words: u32,
    pub subdomain_depth: u32,
    pub url_length: u32,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            free_hosting: 60,
            url_shortener: 30,
            brand_clone: 80,
            brand_keyword: 80,
            suspicious_tld: 25,
            ip_host: 50,
            malicious_file: 100,
            at_symbol: 30,
            panic_words: 20,
            subdomain_depth: 20,
            url_length: 10,
        }
    }
}

/// Older, stricter heuristics. Off unless asked for.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StrictRules {
    pub panic_words: bool,
    pub subdomain_depth: bool,
    pub url_length: bool,
    pub max_subdomain_labels: usize,
    pub max_url_length: usize,
}

impl Default for StrictRules {
    fn default() -> Self {
        Self {
            panic_words: false,
            subdomain_depth: false,
            url_length: false,
            max_subdomain_labels: 4,
            max_url_length: 75,
        }
    }
}

impl StrictRules {
    pub fn enable_all(&mut self) {
        self.panic_words = true;
        self.subdomain_depth = true;
        self.url_length = true;
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TablesConfig {
    pub extra_free_hosting: Vec<String>,
    pub extra_shorteners: Vec<String>,
    pub extra_suspicious_tlds: Vec<String>,
    pub extra_malicious_extensions: Vec<String>,
    pub extra_panic_words: Vec<String>,
    pub extra_brands: Vec<ExtraBrand>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtraBrand {
    pub domain: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForensicsConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for ForensicsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            max_redirects: 10,
        }
    }
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, LinkGuardError> {
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    let path = path.map(Path::new).unwrap_or(default_path);

    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| LinkGuardError::Config(e.to_string()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, LinkGuardError> {
    let cfg: AppConfig =
        toml::from_str(content).map_err(|e| LinkGuardError::Config(e.to_string()))?;
    if !(0.0..1.0).contains(&cfg.scoring.clone_threshold) {
        return Err(LinkGuardError::Config(format!(
            "clone_threshold must be in [0, 1), got {}",
            cfg.scoring.clone_threshold
        )));
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.scoring.guard_threshold, 60);
        assert_eq!(cfg.scoring.weights.free_hosting, 60);
        assert_eq!(cfg.forensics.timeout_ms, 5_000);
        assert!(!cfg.scoring.strict.panic_words);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse_config(
            r#"
            [scoring.weights]
            brand_keyword = 70

            [scoring.strict]
            url_length = true

            [[tables.extra_brands]]
            domain = "example-bank.com"
            keywords = ["examplebank"]

            [forensics]
            timeout_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.scoring.weights.brand_keyword, 70);
        assert_eq!(cfg.scoring.weights.brand_clone, 80);
        assert!(cfg.scoring.strict.url_length);
        assert_eq!(cfg.scoring.strict.max_url_length, 75);
        assert_eq!(cfg.tables.extra_brands[0].domain, "example-bank.com");
        assert_eq!(cfg.forensics.timeout_ms, 1500);
        assert_eq!(cfg.forensics.max_redirects, 10);
    }

    #[test]
    fn rejects_bad_threshold_and_bad_toml() {
        assert!(matches!(
            parse_config("[scoring]\nclone_threshold = 1.5"),
            Err(LinkGuardError::Config(_))
        ));
        assert!(matches!(
            parse_config("[scoring"),
            Err(LinkGuardError::Config(_))
        ));
    }

    #[test]
    fn example_config_parses() {
        let cfg = parse_config(include_str!("../../config/linkguard.example.toml")).unwrap();
        assert_eq!(cfg.tables.extra_free_hosting, vec!["surge.sh"]);
        assert_eq!(cfg.tables.extra_brands[0].keywords, vec!["firstbank"]);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config(Some("does/not/exist.toml")).unwrap();
        assert_eq!(cfg.scoring.clone_threshold, 0.75);
    }
}
