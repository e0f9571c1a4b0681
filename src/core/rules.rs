use std::sync::OnceLock;

use regex::Regex;
use strsim::levenshtein;
use tracing::debug;

use crate::config::ScoringConfig;
use crate::core::link::ParsedLink;
use crate::core::similarity::best_brand_match;
use crate::core::tables::ThreatTables;
use crate::core::verdict::{Finding, RuleKind, ScanResult, MAX_SCORE};

/// Running total plus findings, in the order rules fire.
struct Tally {
    score: u32,
    findings: Vec<Finding>,
}

impl Tally {
    fn hit(&mut self, rule: RuleKind, weight: u32, message: String) {
        debug!(rule = ?rule, weight, "{}", message);
        self.score = self.score.saturating_add(weight);
        self.findings.push(Finding::new(rule, message));
    }

    fn finish(self) -> ScanResult {
        ScanResult {
            score: self.score.min(MAX_SCORE as u32) as u8,
            findings: self.findings,
        }
    }
}

/// Run every rule against `link`. Pure: same input, same tables, same result.
pub fn evaluate(link: &ParsedLink, tables: &ThreatTables, policy: &ScoringConfig) -> ScanResult {
    let w = &policy.weights;
    let mut tally = Tally {
        score: 0,
        findings: Vec::new(),
    };

    if let Some(host) = first_contained(&link.domain, &tables.free_hosting_domains) {
        tally.hit(
            RuleKind::FreeHosting,
            w.free_hosting,
            format!("Hosted on free cloud platform '{}' (high risk)", host),
        );
    }

    if let Some(short) = first_contained(&link.domain, &tables.url_shorteners) {
        tally.hit(
            RuleKind::UrlShortener,
            w.url_shortener,
            format!("Uses URL shortener '{}' to hide the real destination", short),
        );
    }

    // Once hosting alone dominates, brand noise would only double count.
    if tally.score < policy.guard_threshold && !tables.is_official(link.host()) {
        brand_checks(link, tables, policy, &mut tally);
    }

    if let Some(tld) = tables
        .suspicious_tlds
        .iter()
        .find(|tld| link.host().ends_with(tld.as_str()))
    {
        tally.hit(
            RuleKind::SuspiciousTld,
            w.suspicious_tld,
            format!("Uses a low-reputation domain extension '{}'", tld),
        );
    }

    if is_ip_host(link) {
        tally.hit(
            RuleKind::IpHost,
            w.ip_host,
            "Uses raw IP address instead of a domain name".to_string(),
        );
    }

    if let Some(ext) = tables
        .malicious_file_extensions
        .iter()
        .find(|ext| link.full_path.ends_with(ext.as_str()))
    {
        tally.hit(
            RuleKind::MaliciousFile,
            w.malicious_file,
            format!("Link points to a direct malware file download ('{}')", ext),
        );
    }

    if link.raw_input.contains('@') {
        tally.hit(
            RuleKind::AtSymbol,
            w.at_symbol,
            "Contains '@' symbol (browser redirection trick)".to_string(),
        );
    }

    strict_checks(link, tables, policy, &mut tally);

    tally.finish()
}

fn brand_checks(
    link: &ParsedLink,
    tables: &ThreatTables,
    policy: &ScoringConfig,
    tally: &mut Tally,
) {
    let site = link.site();
    if let Some(m) = best_brand_match(site, tables.brand_domains()) {
        if m.ratio > policy.clone_threshold && m.ratio < 1.0 {
            let percent = (m.ratio * 100.0) as u32;
            let edits = levenshtein(site, &m.matched_brand_domain);
            tally.hit(
                RuleKind::BrandClone,
                policy.weights.brand_clone,
                format!(
                    "Possible clone of '{}' ({}% similar, {} edit(s) away)",
                    m.matched_brand_domain, percent, edits
                ),
            );
        }
    }

    for brand in &tables.official_brands {
        if link.domain.contains(brand.domain.as_str()) {
            continue;
        }
        if let Some(keyword) = brand
            .keywords
            .iter()
            .find(|k| link.domain.contains(k.as_str()))
        {
            tally.hit(
                RuleKind::BrandKeyword,
                policy.weights.brand_keyword,
                format!(
                    "Fake {} detected: domain '{}' uses '{}' but is not {}",
                    keyword.to_uppercase(),
                    link.domain,
                    keyword,
                    brand.domain
                ),
            );
        }
    }
}

fn strict_checks(
    link: &ParsedLink,
    tables: &ThreatTables,
    policy: &ScoringConfig,
    tally: &mut Tally,
) {
    let strict = &policy.strict;
    let w = &policy.weights;

    if strict.panic_words {
        let found: Vec<&str> = tables
            .panic_words
            .iter()
            .filter(|word| link.full_path.contains(word.as_str()))
            .map(String::as_str)
            .collect();
        if found.len() >= 2 {
            tally.hit(
                RuleKind::PanicWords,
                w.panic_words,
                format!("Stuffed with lure words: {}", found.join(", ")),
            );
        }
    }

    if strict.subdomain_depth && !is_ip_host(link) {
        let labels = link.host().trim_end_matches('.').split('.').count();
        if labels > strict.max_subdomain_labels {
            tally.hit(
                RuleKind::SubdomainDepth,
                w.subdomain_depth,
                format!("Excessive subdomain depth ({} labels)", labels),
            );
        }
    }

    if strict.url_length {
        let len = link.full_path.chars().count();
        if len > strict.max_url_length {
            tally.hit(
                RuleKind::UrlLength,
                w.url_length,
                format!("Unusually long URL ({} characters)", len),
            );
        }
    }
}

fn first_contained<'a>(domain: &str, entries: &'a [String]) -> Option<&'a str> {
    entries
        .iter()
        .map(String::as_str)
        .find(|entry| domain.contains(entry))
}

fn is_ip_host(link: &ParsedLink) -> bool {
    static DOTTED_QUAD: OnceLock<Regex> = OnceLock::new();
    let re = DOTTED_QUAD.get_or_init(|| {
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("static regex")
    });
    link.host().starts_with('[') || re.is_match(&link.domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::link::normalize;

    fn run(raw: &str) -> ScanResult {
        evaluate(
            &normalize(raw).unwrap(),
            &ThreatTables::builtin(),
            &ScoringConfig::default(),
        )
    }

    fn run_strict(raw: &str) -> ScanResult {
        let mut policy = ScoringConfig::default();
        policy.strict.enable_all();
        evaluate(&normalize(raw).unwrap(), &ThreatTables::builtin(), &policy)
    }

    #[test]
    fn clean_domain_scores_zero() {
        let res = run("https://example.com/about");
        assert_eq!(res.score, 0);
        assert!(res.findings.is_empty());
    }

    #[test]
    fn free_hosting_fires_once_even_with_overlapping_entries() {
        // "app.onrender.com" contains both "onrender.com" and "render.com"
        let res = run("https://app.onrender.com");
        assert_eq!(res.score, 60);
        assert_eq!(res.findings.len(), 1);
        assert!(res.findings[0].message.contains("onrender.com"));
    }

    #[test]
    fn shortener_adds_weight() {
        let res = run("https://bit.ly/3xYz");
        assert_eq!(res.score, 30);
        assert!(res.has(RuleKind::UrlShortener));
    }

    #[test]
    fn clone_names_brand_and_percentage() {
        let res = run("http://paypa1.com/signin");
        assert_eq!(res.score, 80);
        let clone = res
            .findings
            .iter()
            .find(|f| f.rule == RuleKind::BrandClone)
            .unwrap();
        assert!(clone.message.contains("paypal.com"));
        assert!(clone.message.contains("90%"));
        assert!(clone.message.contains("1 edit(s)"));
    }

    #[test]
    fn keyword_impersonation_with_suspicious_tld() {
        let res = run("http://paypal-secure-login.xyz");
        assert!(res.has(RuleKind::BrandKeyword));
        assert!(res.has(RuleKind::SuspiciousTld));
        assert!(!res.has(RuleKind::BrandClone));
        assert_eq!(res.score, 100);
    }

    #[test]
    fn keyword_fires_once_per_brand() {
        // both google keywords present; only one finding for google.com
        let res = run("http://gmail-google-support.net");
        let hits: Vec<_> = res
            .findings
            .iter()
            .filter(|f| f.rule == RuleKind::BrandKeyword)
            .collect();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].message.contains("google.com"));
    }

    #[test]
    fn brand_domain_inside_other_host_skips_keyword() {
        // canonical domain appears as substring, so the keyword loop stays quiet
        let res = run("http://paypal.com.account-check.net");
        assert!(!res.has(RuleKind::BrandKeyword));
    }

    #[test]
    fn guard_skips_brand_checks_after_free_hosting() {
        let res = run("https://paypal-login.herokuapp.com");
        assert_eq!(res.score, 60);
        assert!(!res.has(RuleKind::BrandKeyword));
        assert!(!res.has(RuleKind::BrandClone));
    }

    #[test]
    fn guard_threshold_is_configurable() {
        let mut policy = ScoringConfig::default();
        policy.guard_threshold = 200;
        let res = evaluate(
            &normalize("https://paypal-login.herokuapp.com").unwrap(),
            &ThreatTables::builtin(),
            &policy,
        );
        assert!(res.has(RuleKind::BrandKeyword));
        assert_eq!(res.score, 100);
    }

    #[test]
    fn tld_ignores_port() {
        let res = run("http://shop.example.xyz:8080/");
        assert!(res.has(RuleKind::SuspiciousTld));
        assert_eq!(res.score, 25);
    }

    #[test]
    fn ipv6_literal_is_raw_ip() {
        let res = run("http://[::1]/admin");
        assert!(res.has(RuleKind::IpHost));
    }

    #[test]
    fn rule_order_is_evaluation_order() {
        let res = run("http://bit.ly@10.0.0.1/a.apk");
        let order: Vec<RuleKind> = res.findings.iter().map(|f| f.rule).collect();
        assert_eq!(
            order,
            vec![RuleKind::IpHost, RuleKind::MaliciousFile, RuleKind::AtSymbol]
        );
        assert_eq!(res.score, 100);
    }

    #[test]
    fn strict_rules_are_off_by_default() {
        let raw = "http://secure.login.verify.account.example.com/update/password";
        assert_eq!(run(raw).score, 0);
        let strict = run_strict(raw);
        assert!(strict.has(RuleKind::PanicWords));
        assert!(strict.has(RuleKind::SubdomainDepth));
        assert!(!strict.has(RuleKind::UrlLength));
        assert_eq!(strict.score, 40);
    }

    #[test]
    fn strict_url_length() {
        let raw = format!("https://example.com/{}", "a".repeat(80));
        let res = run_strict(&raw);
        assert!(res.has(RuleKind::UrlLength));
        assert_eq!(res.score, 10);
    }

    #[test]
    fn single_panic_word_is_not_stuffing() {
        let res = run_strict("https://example.com/login");
        assert!(!res.has(RuleKind::PanicWords));
    }
}
