//! HTTP client error types.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to a remote service.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be built or sent.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// No answer within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-success status.
    #[error("HTTP {status} for {url}: {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl FetchError {
    /// Timeouts, connection failures and 5xx responses are worth another try.
    pub fn is_retriable(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Connection(_) => true,
            FetchError::Http { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server rejected our credentials or token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub(crate) fn from_reqwest(e: reqwest::Error, url: &str) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else if e.is_connect() || e.is_request() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Request(e.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

/// Human readable message from an error body.
///
/// Understands `{"error": {"message": ..}}` and `{"message": ..}`, otherwise
/// falls back to the (shortened) raw body.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }
    body.trim().chars().take(200).collect()
}
