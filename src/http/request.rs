//! Outgoing request description.
//!
//! # Responsibilities
//! - Describe one logical call (target, method, body, header overrides)
//! - Resolve the target against the configured base URL
//! - Assemble headers: JSON content type, overrides, bearer token, request ID
//!
//! # Design Decisions
//! - A descriptor is cheap to clone and is re-issued unchanged on retry,
//!   apart from its retry counter
//! - Header overrides are applied after the default content type, the bearer
//!   token after the overrides
//! - Request ID is generated once per logical call, shared by its retries

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE,
};
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use url::Url;
use uuid::Uuid;

use crate::http::error::ApiError;

/// Header carrying the per-call correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation ID attached to every attempt of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One call through the pipeline.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Path relative to the base URL, or an absolute http(s) URL.
    pub url: String,
    pub method: Method,
    /// JSON payload; serialized once per attempt.
    pub body: Option<Value>,
    /// Overrides merged on top of the default headers.
    pub headers: HeaderMap,
    /// Never read the stored token nor send an authorization header.
    pub skip_auth: bool,
    /// Retries already issued for this call.
    pub retry: u32,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            headers: HeaderMap::new(),
            skip_auth: false,
            retry: 0,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    /// Whether the target bypasses the base URL.
    pub fn is_absolute(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }

    /// Resolve the target: absolute URLs as-is, anything else appended to `base_url`.
    pub fn resolve_url(&self, base_url: &str) -> Result<Url, ApiError> {
        let full = if self.is_absolute() {
            self.url.clone()
        } else {
            format!("{}{}", base_url, self.url)
        };

        Url::parse(&full).map_err(|e| ApiError::unknown(format!("Invalid URL '{}': {}", full, e)))
    }

    /// Headers for one attempt. `token` is ignored when `skip_auth` is set.
    pub fn build_headers(
        &self,
        token: Option<&str>,
        request_id: &RequestId,
    ) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in self.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        if !self.skip_auth {
            if let Some(token) = token {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ApiError::unknown(format!("Invalid auth token: {}", e)))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        let id = HeaderValue::from_str(&request_id.to_string())
            .map_err(|e| ApiError::unknown(e.to_string()))?;
        headers.insert(HeaderName::from_static(X_REQUEST_ID), id);

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_url_is_appended_to_base() {
        let req = RequestDescriptor::get("/baskets");
        let url = req.resolve_url("http://localhost:1337").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1337/baskets");

        // Base path prefixes survive (no URL-join semantics).
        let url = req.resolve_url("http://localhost:5173/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5173/api/baskets");
    }

    #[test]
    fn test_absolute_url_bypasses_base() {
        let req = RequestDescriptor::get("https://other.example.com/x?y=1");
        let url = req.resolve_url("http://localhost:1337").unwrap();
        assert_eq!(url.as_str(), "https://other.example.com/x?y=1");
    }

    #[test]
    fn test_invalid_url_is_unknown_error() {
        let req = RequestDescriptor::get("/baskets");
        let err = req.resolve_url("not a base").unwrap_err();
        assert_eq!(err.status, 500);
        assert!(err.is_unknown());
    }

    #[test]
    fn test_headers_with_token() {
        let id = RequestId::new();
        let headers = RequestDescriptor::get("/x").build_headers(Some("abc"), &id).unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert_eq!(headers[X_REQUEST_ID], id.to_string().as_str());
    }

    #[test]
    fn test_skip_auth_suppresses_header() {
        let headers = RequestDescriptor::post("/send-otp")
            .skip_auth()
            .build_headers(Some("stale"), &RequestId::new())
            .unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_overrides_replace_content_type_but_not_token() {
        let headers = RequestDescriptor::get("/x")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .with_header(AUTHORIZATION, HeaderValue::from_static("Basic zzz"))
            .build_headers(Some("abc"), &RequestId::new())
            .unwrap();

        assert_eq!(headers[CONTENT_TYPE], "text/plain");
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let err = RequestDescriptor::get("/x")
            .build_headers(Some("bad\ntoken"), &RequestId::new())
            .unwrap_err();
        assert!(err.is_unknown());
    }
}
