use reqwest::StatusCode;

/// Startup configuration problems. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("config load failed: {0}")]
    Load(#[from] config::ConfigError),
}

/// Upstream page fetch failures. The sync loop stops on any of these.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("non-success status={status} body_snippet={body}")]
    Status { status: StatusCode, body: String },

    #[error("decode failed: {reason} body_snippet={body}")]
    Decode { reason: String, body: String },
}

/// Backend forward failures. The record is dropped and the loop continues.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("non-success status={status} body_snippet={body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed reply: {reason} body_snippet={body}")]
    Malformed { reason: String, body: String },

    #[error("backend rejected listing: {0}")]
    Rejected(String),
}

pub(crate) fn snippet(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
