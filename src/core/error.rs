use std::io;

#[derive(thiserror::Error, Debug)]
pub enum LinkGuardError {
    #[error("malformed url: {0}")]
    MalformedUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("http error: {0}")]
    Http(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unknown error")]
    Unknown,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for LinkGuardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LinkGuardError::Timeout
        } else if err.is_connect() {
            LinkGuardError::Network(err.to_string())
        } else if err.is_status() {
            LinkGuardError::Http(err.to_string())
        } else if err.is_redirect() || err.is_request() || err.is_body() || err.is_decode() {
            LinkGuardError::Http(err.to_string())
        } else {
            LinkGuardError::Unknown
        }
    }
}
