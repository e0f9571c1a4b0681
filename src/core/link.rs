use url::{Host, Url};

use crate::core::error::LinkGuardError;

/// A candidate link after schema normalization, ready for rule matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub raw_input: String,
    /// Trimmed input with an `http://` prefix added when no schema was given.
    pub normalized_url: String,
    /// Lowercased `host[:port]`, never including userinfo.
    pub domain: String,
    /// Lowercased `normalized_url`.
    pub full_path: String,
    host_len: usize,
}

impl ParsedLink {
    /// The bare host, without any port.
    pub fn host(&self) -> &str {
        &self.domain[..self.host_len]
    }

    /// Host with a leading `www.` removed, used for brand comparisons.
    pub fn site(&self) -> &str {
        let host = self.host();
        host.strip_prefix("www.").unwrap_or(host)
    }
}

/// Canonicalize a raw, possibly schema-less string into a [`ParsedLink`].
pub fn normalize(raw: &str) -> Result<ParsedLink, LinkGuardError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LinkGuardError::MalformedUrl("empty input".into()));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(LinkGuardError::MalformedUrl("url contains control characters".into()));
    }

    let normalized_url = with_schema(trimmed)?;
    if authority(&normalized_url).chars().any(char::is_whitespace) {
        return Err(LinkGuardError::MalformedUrl("whitespace in host".into()));
    }
    let url = Url::parse(&normalized_url)
        .map_err(|e| LinkGuardError::MalformedUrl(e.to_string()))?;

    let host = match url.host() {
        Some(Host::Domain(d)) => {
            let d = d.to_lowercase();
            validate_domain(&d)?;
            // "paypal.com." and "paypal.com" are the same host
            d.strip_suffix('.').unwrap_or(&d).to_string()
        }
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => format!("[{}]", ip),
        None => return Err(LinkGuardError::MalformedUrl("no host".into())),
    };
    let host_len = host.len();
    let domain = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    };

    Ok(ParsedLink {
        raw_input: raw.to_string(),
        full_path: normalized_url.to_lowercase(),
        normalized_url,
        domain,
        host_len,
    })
}

fn with_schema(trimmed: &str) -> Result<String, LinkGuardError> {
    let lowered = trimmed.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return Ok(trimmed.to_string());
    }
    if let Some((scheme, _)) = trimmed.split_once("://") {
        let looks_like_scheme = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if looks_like_scheme {
            return Err(LinkGuardError::MalformedUrl(format!(
                "unsupported scheme '{}'",
                scheme
            )));
        }
    }
    Ok(format!("http://{}", trimmed))
}

/// Everything between `://` and the first `/`, `?` or `#`.
fn authority(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

fn validate_domain(domain: &str) -> Result<(), LinkGuardError> {
    let body = domain.strip_suffix('.').unwrap_or(domain);
    if body.is_empty() {
        return Err(LinkGuardError::MalformedUrl("empty host".into()));
    }
    for label in body.split('.') {
        if label.is_empty() {
            return Err(LinkGuardError::MalformedUrl(format!(
                "empty label in host '{}'",
                domain
            )));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(LinkGuardError::MalformedUrl(format!(
                "invalid host '{}'",
                domain
            )));
        }
    }
    Ok(())
}
