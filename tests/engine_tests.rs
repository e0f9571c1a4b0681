use link_guard::config::{parse_config, ScoringConfig};
use link_guard::core::link::normalize;
use link_guard::core::scanner::Scanner;
use link_guard::core::tables::{BrandEntry, ThreatTables};
use link_guard::core::verdict::RuleKind;

fn scanner() -> Scanner {
    Scanner::default()
}

#[test]
fn score_is_always_within_bounds() {
    let s = scanner();
    let inputs = [
        "",
        "example.com",
        "http://paypal-login.xyz@192.168.0.1/gmail/facebook/update.exe",
        "https://bit.ly.netlify.app.herokuapp.com/x.apk",
        "ht!tp://not a url",
        "https://www.paypal.com/login",
    ];
    for raw in inputs {
        let res = s.scan(raw);
        assert!(res.score <= 100, "{raw:?} scored {}", res.score);
    }
}

#[test]
fn scanning_is_idempotent() {
    let s = scanner();
    for raw in ["paypa1.com", "http://192.168.1.5/login", "bit.ly/abc@x"] {
        assert_eq!(s.scan(raw), s.scan(raw));
    }
}

#[test]
fn schema_is_optional() {
    let bare = normalize("example.com/path").unwrap();
    let full = normalize("http://example.com/path").unwrap();
    assert_eq!(bare.domain, full.domain);
    assert_eq!(bare.full_path, full.full_path);
    assert_eq!(scanner().scan("example.com/path"), scanner().scan("http://example.com/path"));
}

#[test]
fn official_brand_is_trusted() {
    let res = scanner().scan("https://www.paypal.com/login");
    assert!(!res.has(RuleKind::BrandClone));
    assert!(!res.has(RuleKind::BrandKeyword));
    assert_eq!(res.score, 0);
}

#[test]
fn lookalike_domain_is_flagged_as_clone() {
    let res = scanner().scan("paypa1.com");
    let clone = res
        .findings
        .iter()
        .find(|f| f.rule == RuleKind::BrandClone)
        .expect("clone finding");
    assert!(clone.message.contains("paypal.com"));
    assert_eq!(res.score, 80);
}

#[test]
fn free_hosting_suppresses_brand_checks() {
    let res = scanner().scan("https://secure-facebook-login.netlify.app");
    assert!(res.has(RuleKind::FreeHosting));
    assert!(!res.has(RuleKind::BrandClone));
    assert!(!res.has(RuleKind::BrandKeyword));
    assert_eq!(res.score, 60);
    assert_eq!(res.findings.len(), 1);
    assert!(res.findings[0].message.contains("netlify.app"));
}

#[test]
fn malware_download_is_always_flagged() {
    let res = scanner().scan("http://x.com/payload.exe");
    assert!(res.has(RuleKind::MaliciousFile));
    assert_eq!(res.score, 100);
}

#[test]
fn raw_ip_host() {
    let s = scanner();
    let ip = s.scan("http://192.168.1.5/login");
    assert!(ip.has(RuleKind::IpHost));
    assert_eq!(ip.score, 50);
    assert!(!s.scan("http://example.com").has(RuleKind::IpHost));
}

#[test]
fn malformed_input_is_maximum_risk() {
    let s = scanner();
    for raw in ["ht!tp://not a url", "", "http://", "ftp://files.example"] {
        let res = s.scan(raw);
        assert_eq!(res.score, 100, "{raw:?}");
        assert_eq!(res.findings.len(), 1);
        assert_eq!(res.findings[0].rule, RuleKind::Malformed);
        assert!(res.findings[0].message.contains("malformed"));
    }
}

#[test]
fn at_symbol_counts_once() {
    let res = scanner().scan("http://a@b@c@example.com/@@");
    let hits = res
        .findings
        .iter()
        .filter(|f| f.rule == RuleKind::AtSymbol)
        .count();
    assert_eq!(hits, 1);
    assert_eq!(res.score, 30);
}

#[test]
fn substituted_tables_are_honored() {
    let tables = ThreatTables {
        free_hosting_domains: vec![],
        url_shorteners: vec![],
        official_brands: vec![BrandEntry {
            domain: "examplebank.com".into(),
            keywords: vec!["examplebank".into()],
        }],
        suspicious_tlds: vec![".test".into()],
        malicious_file_extensions: vec![],
        panic_words: vec![],
    };
    let s = Scanner::new(tables, ScoringConfig::default());

    let clone = s.scan("examp1ebank.com");
    assert!(clone.has(RuleKind::BrandClone));

    let keyword = s.scan("examplebank-login.test");
    assert!(keyword.has(RuleKind::BrandKeyword));
    assert!(keyword.has(RuleKind::SuspiciousTld));
    assert_eq!(keyword.score, 100);

    // tables without the built-in entries: paypa1.com is no longer special
    assert_eq!(s.scan("paypa1.com").score, 0);
}

#[test]
fn config_weights_flow_into_scores() {
    let cfg = parse_config(
        r#"
        [scoring.weights]
        brand_keyword = 70
        suspicious_tld = 10
        "#,
    )
    .unwrap();
    let s = Scanner::from_config(&cfg);
    let res = s.scan("http://netflix-billing.top");
    assert!(res.has(RuleKind::BrandKeyword));
    assert!(res.has(RuleKind::SuspiciousTld));
    assert_eq!(res.score, 80);
}

#[test]
fn scanner_is_shareable_across_threads() {
    let s = std::sync::Arc::new(scanner());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let s = s.clone();
            std::thread::spawn(move || s.scan("paypa1.com").score)
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 80);
    }
}

#[test]
fn trailing_root_dot_does_not_change_the_verdict() {
    let s = scanner();
    let tld = s.scan("http://secure-login.xyz./");
    assert!(tld.has(RuleKind::SuspiciousTld));
    assert_eq!(tld.score, 25);
    assert_eq!(tld, s.scan("http://secure-login.xyz/"));

    let official = s.scan("https://www.paypal.com./login");
    assert!(!official.has(RuleKind::BrandClone));
    assert!(!official.has(RuleKind::BrandKeyword));
    assert_eq!(official.score, 0);
}

#[test]
fn microsoft_mail_domains_are_not_fakes() {
    let s = scanner();
    for raw in [
        "https://outlook.com",
        "https://outlook.live.com/mail/",
        "https://www.office365.com",
    ] {
        let res = s.scan(raw);
        assert!(!res.has(RuleKind::BrandKeyword), "{raw:?}: {:?}", res.findings);
        assert!(!res.has(RuleKind::BrandClone), "{raw:?}: {:?}", res.findings);
        assert_eq!(res.score, 0, "{raw:?}");
    }
}

#[test]
fn clone_threshold_is_exclusive() {
    let tables = ThreatTables {
        free_hosting_domains: vec![],
        url_shorteners: vec![],
        official_brands: vec![BrandEntry {
            domain: "abcdefgh.com".into(),
            keywords: vec![],
        }],
        suspicious_tlds: vec![],
        malicious_file_extensions: vec![],
        panic_words: vec![],
    };
    let s = Scanner::new(tables, ScoringConfig::default());

    // "abcde" + ".com" shared: 2 * 9 / 24 == 0.75 exactly
    let at_threshold = s.scan("abcdexyz.com");
    assert!(!at_threshold.has(RuleKind::BrandClone));
    assert_eq!(at_threshold.score, 0);

    // "abcdef" + ".com" shared: 2 * 10 / 24
    let above = s.scan("abcdefyz.com");
    assert!(above.has(RuleKind::BrandClone));
    assert_eq!(above.score, 80);

    // identical is official, never a clone of itself
    assert_eq!(s.scan("abcdefgh.com").score, 0);
}

#[test]
fn spaces_in_the_path_are_not_malformed() {
    let res = scanner().scan("https://example.com/my file.pdf");
    assert!(!res.has(RuleKind::Malformed));
    assert_eq!(res.score, 0);

    let res = scanner().scan("http://exa mple.com/");
    assert!(res.has(RuleKind::Malformed));
}
