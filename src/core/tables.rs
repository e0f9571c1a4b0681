//! Static threat-intelligence tables consulted by the rule evaluator.
//!
//! Tables are a hand-curated snapshot. They are built once per process,
//! optionally extended from configuration, and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::config::TablesConfig;

/// A canonical brand domain and the keywords that suggest it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandEntry {
    pub domain: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreatTables {
    pub free_hosting_domains: Vec<String>,
    pub url_shorteners: Vec<String>,
    /// Ordered; similarity ties resolve to the earliest entry.
    pub official_brands: Vec<BrandEntry>,
    pub suspicious_tlds: Vec<String>,
    pub malicious_file_extensions: Vec<String>,
    pub panic_words: Vec<String>,
}

const FREE_HOSTING_DOMAINS: &[&str] = &[
    "000webhostapp.com",
    "herokuapp.com",
    "netlify.app",
    "vercel.app",
    "pages.dev",
    "firebaseapp.com",
    "web.app",
    "glitch.me",
    "repl.co",
    "wixsite.com",
    "weebly.com",
    "koyeb.app",
    "onrender.com",
    "render.com",
    "railway.app",
    "fly.dev",
    "github.io",
    "blogspot.com",
    "duckdns.org",
    "ngrok.io",
    "ngrok-free.app",
];

const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "cutt.ly",
    "rebrand.ly",
    "shorturl.at",
    "tiny.cc",
    "rb.gy",
];

const OFFICIAL_BRANDS: &[(&str, &[&str])] = &[
    ("paypal.com", &["paypal"]),
    ("facebook.com", &["facebook", "faceb00k"]),
    ("instagram.com", &["instagram", "1nstagram"]),
    ("twitter.com", &["twitter"]),
    ("google.com", &["google", "gmail", "g00gle"]),
    ("microsoft.com", &["microsoft", "micros0ft"]),
    ("netflix.com", &["netflix", "netfl1x"]),
    ("amazon.com", &["amazon", "amaz0n"]),
    ("gtbank.com", &["gtbank", "gtworld"]),
    ("zenithbank.com", &["zenith"]),
    ("accessbankplc.com", &["accessbank"]),
    ("ubagroup.com", &["ubagroup", "ubabank"]),
    ("opayweb.com", &["opay"]),
    ("palmpay.com", &["palmpay"]),
];

const SUSPICIOUS_TLDS: &[&str] = &[
    ".xyz", ".top", ".club", ".vip", ".gq", ".tk", ".ml", ".cf", ".ga", ".cc", ".info",
    ".buzz", ".rest", ".work", ".click", ".link", ".live", ".monster", ".cyou",
];

const MALICIOUS_FILE_EXTENSIONS: &[&str] = &[
    ".exe", ".apk", ".scr", ".bat", ".cmd", ".sh", ".msi", ".jar", ".vbs", ".ps1", ".zip",
    ".rar", ".7z", ".iso", ".dmg",
];

const PANIC_WORDS: &[&str] = &[
    "login",
    "signin",
    "verify",
    "verification",
    "update",
    "secure",
    "account",
    "banking",
    "confirm",
    "password",
    "wallet",
    "urgent",
    "suspended",
    "locked",
    "unlock",
    "bonus",
    "gift",
    "winner",
    "free",
];

impl ThreatTables {
    /// The built-in snapshot.
    pub fn builtin() -> Self {
        Self {
            free_hosting_domains: owned(FREE_HOSTING_DOMAINS),
            url_shorteners: owned(URL_SHORTENERS),
            official_brands: OFFICIAL_BRANDS
                .iter()
                .map(|(domain, keywords)| BrandEntry {
                    domain: domain.to_string(),
                    keywords: owned(keywords),
                })
                .collect(),
            suspicious_tlds: owned(SUSPICIOUS_TLDS),
            malicious_file_extensions: owned(MALICIOUS_FILE_EXTENSIONS),
            panic_words: owned(PANIC_WORDS),
        }
    }

    /// Built-in snapshot extended with configured extras.
    pub fn from_config(cfg: &TablesConfig) -> Self {
        let mut tables = Self::builtin();
        extend_unique(&mut tables.free_hosting_domains, &cfg.extra_free_hosting);
        extend_unique(&mut tables.url_shorteners, &cfg.extra_shorteners);
        extend_unique(&mut tables.suspicious_tlds, &cfg.extra_suspicious_tlds);
        extend_unique(
            &mut tables.malicious_file_extensions,
            &cfg.extra_malicious_extensions,
        );
        extend_unique(&mut tables.panic_words, &cfg.extra_panic_words);

        for extra in &cfg.extra_brands {
            let domain = clean(&extra.domain);
            if domain.is_empty() {
                continue;
            }
            match tables.official_brands.iter_mut().find(|b| b.domain == domain) {
                Some(existing) => extend_unique(&mut existing.keywords, &extra.keywords),
                None => {
                    let mut keywords = Vec::new();
                    extend_unique(&mut keywords, &extra.keywords);
                    tables.official_brands.push(BrandEntry { domain, keywords });
                }
            }
        }
        tables
    }

    pub fn brand_domains(&self) -> impl Iterator<Item = &str> {
        self.official_brands.iter().map(|b| b.domain.as_str())
    }

    /// True when `host` is an official brand domain or one of its subdomains.
    pub fn is_official(&self, host: &str) -> bool {
        self.brand_domains().any(|official| {
            host == official
                || host
                    .strip_suffix(official)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn clean(entry: &str) -> String {
    entry.trim().to_lowercase()
}

fn extend_unique(target: &mut Vec<String>, extra: &[String]) {
    for entry in extra.iter().map(|e| clean(e)) {
        if !entry.is_empty() && !target.contains(&entry) {
            target.push(entry);
        }
    }
}
