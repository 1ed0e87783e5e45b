//! Error types surfaced by the request pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Code attached to a per-attempt timeout.
pub const TIMEOUT: &str = "TIMEOUT";
/// Code attached to connection, DNS and request-level failures.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
/// Code attached to anything that is neither a transport nor a server error.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Normalized error returned by every pipeline call.
///
/// `status` is 0 for a pure network failure, 408 for a timeout, and the HTTP
/// status of the response otherwise. Callers branch on `status`/`code` only.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            code: None,
            details: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn timeout() -> Self {
        Self::new(408, "Request timeout").with_code(TIMEOUT)
    }

    pub fn network() -> Self {
        Self::new(0, "Network error. Please check your connection.").with_code(NETWORK_ERROR)
    }

    /// Wrap an unexpected failure, keeping its message when there is one.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            "An unexpected error occurred".to_string()
        } else {
            message
        };
        Self::new(500, message).with_code(UNKNOWN_ERROR)
    }

    pub fn is_timeout(&self) -> bool {
        self.code.as_deref() == Some(TIMEOUT)
    }

    pub fn is_network(&self) -> bool {
        self.code.as_deref() == Some(NETWORK_ERROR)
    }

    pub fn is_unknown(&self) -> bool {
        self.code.as_deref() == Some(UNKNOWN_ERROR)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::unknown(e.to_string())
    }
}

/// Failures reported by a [`Transport`](crate::http::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, DNS or request-level failure; the backend was not reached.
    #[error("network error: {0}")]
    Network(String),

    /// The transport gave up waiting on its own deadline.
    #[error("transport timed out")]
    Timeout,

    /// Anything else (body read failures, builder errors).
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() || e.is_request() {
            TransportError::Network(e.to_string())
        } else {
            TransportError::Other(e.to_string())
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Network(_) => ApiError::network(),
            TransportError::Timeout => ApiError::timeout(),
            TransportError::Other(message) => ApiError::unknown(message),
        }
    }
}
