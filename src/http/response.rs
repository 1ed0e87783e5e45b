//! Response handling and normalization.
//!
//! # Responsibilities
//! - Decode successful bodies (JSON when declared, raw text otherwise)
//! - Map non-2xx responses to [`ApiError`]
//!
//! # Design Decisions
//! - Content type decides the decoding, not the body's shape
//! - Raw text is handed to the caller's type as a JSON string, so `String`
//!   and `serde_json::Value` receive it verbatim
//! - A malformed error body never raises; it degrades to the status reason

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::transport::TransportResponse;

/// Successful outcome of a pipeline call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub data: T,
    pub success: bool,
    pub status: u16,
}

impl<T> ResultEnvelope<T> {
    pub fn new(data: T, status: u16) -> Self {
        Self {
            data,
            success: true,
            status,
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        ResultEnvelope {
            data: f(self.data),
            success: self.success,
            status: self.status,
        }
    }
}

/// Whether the declared content type is JSON.
pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

/// Decode a 2xx body into `T`.
pub fn decode_success<T: DeserializeOwned>(response: &TransportResponse) -> Result<T, ApiError> {
    if is_json(&response.headers) {
        Ok(serde_json::from_slice(&response.body)?)
    } else {
        let text = String::from_utf8_lossy(&response.body).into_owned();
        Ok(serde_json::from_value(Value::String(text))?)
    }
}

/// Build the error for a non-2xx response.
pub fn error_from_response(response: &TransportResponse) -> ApiError {
    let status = response.status;
    let reason = status.canonical_reason().unwrap_or("");

    let mut code = None;
    let mut details = None;
    let message = if is_json(&response.headers) {
        match serde_json::from_slice::<Value>(&response.body) {
            Ok(Value::Object(map)) => {
                code = map.get("code").and_then(code_from_value);
                details = map.get("details").filter(|v| !v.is_null()).cloned();
                map.get("message").and_then(message_from_value)
            }
            Ok(_) => None,
            Err(_) => Some(reason.to_string()),
        }
    } else {
        Some(String::from_utf8_lossy(&response.body).into_owned())
    };

    let message = message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), reason));

    ApiError {
        message,
        status: status.as_u16(),
        code,
        details,
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn code_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
