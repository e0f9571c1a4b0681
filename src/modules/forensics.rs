use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::{header::SERVER, redirect::Policy, Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ForensicsConfig;
use crate::core::{error::LinkGuardError, link::normalize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForensicDetails {
    pub final_url: String,
    pub redirect_chain: Vec<String>,
    pub server_header: String,
    pub page_title: String,
    pub http_status_code: u16,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of a live probe. Informational only; never feeds the score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ForensicReport {
    Success(ForensicDetails),
    Error { message: String },
}

impl ForensicReport {
    pub fn is_success(&self) -> bool {
        matches!(self, ForensicReport::Success(_))
    }
}

/// One GET against the link, following redirects and recording every hop.
pub async fn fetch_forensics(raw: &str, cfg: &ForensicsConfig) -> ForensicReport {
    match try_fetch(raw, cfg).await {
        Ok(details) => {
            debug!(
                hops = details.redirect_chain.len(),
                status = details.http_status_code,
                "forensic fetch for {} landed on {}",
                raw,
                details.final_url
            );
            ForensicReport::Success(details)
        }
        Err(err) => {
            warn!("forensic fetch for {} failed: {}", raw, err);
            ForensicReport::Error {
                message: err.to_string(),
            }
        }
    }
}

async fn try_fetch(raw: &str, cfg: &ForensicsConfig) -> Result<ForensicDetails, LinkGuardError> {
    let link = normalize(raw)?;
    let start = Url::parse(&link.normalized_url)
        .map_err(|e| LinkGuardError::MalformedUrl(e.to_string()))?;

    let hops: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&hops);
    let max_redirects = cfg.max_redirects;
    let policy = Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            return attempt.error("too many redirects");
        }
        if let Ok(mut seen) = recorder.lock() {
            seen.push(attempt.url().to_string());
        }
        attempt.follow()
    });

    let client = Client::builder()
        .user_agent(cfg.user_agent.clone())
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .redirect(policy)
        .build()
        .map_err(LinkGuardError::from)?;

    let response = client.get(start.clone()).send().await?;
    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let server_header = response
        .headers()
        .get(SERVER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| "Unknown".to_string());
    let body = response.text().await?;

    // same canonical form as the recorded hops
    let mut chain = vec![start.to_string()];
    if let Ok(seen) = hops.lock() {
        chain.extend(seen.iter().cloned());
    }
    chain.push(final_url.clone());

    Ok(ForensicDetails {
        final_url,
        redirect_chain: dedupe_in_order(chain),
        server_header,
        page_title: extract_title(&body).unwrap_or_else(|| "No title found".to_string()),
        http_status_code: status,
        fetched_at: Utc::now(),
    })
}

fn dedupe_in_order(chain: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(chain.len());
    for hop in chain {
        let key = hop.trim_end_matches('/');
        if !out.iter().any(|seen| seen.trim_end_matches('/') == key) {
            out.push(hop);
        }
    }
    out
}

pub fn extract_title(html: &str) -> Option<String> {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    let re = TITLE.get_or_init(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("static regex"));
    let raw = re.captures(html)?.get(1)?.as_str();
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
