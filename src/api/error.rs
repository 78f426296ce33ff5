//! API error type

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`AwClient`](super::client::AwClient) calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Server answered with a non-success status. `message` is what the UI shows.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid server URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

/// Extract the user-facing message from an error response body.
///
/// aw-server replies `{"status": .., "message": ".."}`; anything else falls
/// back to the raw body, then the status reason.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() && !body.starts_with('<') {
        return body.chars().take(200).collect();
    }

    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => format!("HTTP {}", status.as_u16()),
    }
}
