//! Shared HTTP verbs for the API services.

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::http::{ApiError, RequestDescriptor, RequestPipeline, ResultEnvelope};

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub skip_auth: bool,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn skip_auth() -> Self {
        Self {
            skip_auth: true,
            ..Self::default()
        }
    }
}

/// Base for every API service: verbs over a shared pipeline.
#[derive(Debug, Clone)]
pub struct ApiService {
    pipeline: Arc<RequestPipeline>,
}

impl ApiService {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Arc<RequestPipeline> {
        &self.pipeline
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<ResultEnvelope<T>, ApiError> {
        self.send(Method::GET, url.to_string(), None, options).await
    }

    /// GET with query parameters taken from a serializable object.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &(impl Serialize + ?Sized),
        options: RequestOptions,
    ) -> Result<ResultEnvelope<T>, ApiError> {
        let query = build_query_string(params)?;
        let url = if query.is_empty() {
            url.to_string()
        } else {
            format!("{}?{}", url, query)
        };

        self.send(Method::GET, url, None, options).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        data: &(impl Serialize + ?Sized),
        options: RequestOptions,
    ) -> Result<ResultEnvelope<T>, ApiError> {
        let body = encode_body(data)?;
        self.send(Method::POST, url.to_string(), body, options).await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<ResultEnvelope<T>, ApiError> {
        self.send(Method::POST, url.to_string(), None, options).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        url: &str,
        data: &(impl Serialize + ?Sized),
        options: RequestOptions,
    ) -> Result<ResultEnvelope<T>, ApiError> {
        let body = encode_body(data)?;
        self.send(Method::PUT, url.to_string(), body, options).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        url: &str,
        data: &(impl Serialize + ?Sized),
        options: RequestOptions,
    ) -> Result<ResultEnvelope<T>, ApiError> {
        let body = encode_body(data)?;
        self.send(Method::PATCH, url.to_string(), body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<ResultEnvelope<T>, ApiError> {
        self.send(Method::DELETE, url.to_string(), None, options).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<ResultEnvelope<T>, ApiError> {
        let mut descriptor = RequestDescriptor::new(method, url).with_headers(options.headers);
        descriptor.body = body;
        descriptor.skip_auth = options.skip_auth;

        self.pipeline.execute(descriptor).await
    }
}

/// Serialize a body; `null` payloads are not sent.
fn encode_body(data: &(impl Serialize + ?Sized)) -> Result<Option<Value>, ApiError> {
    let value = serde_json::to_value(data)?;
    Ok((!value.is_null()).then_some(value))
}

/// Encode an object's fields as a query string, skipping null values.
pub fn build_query_string(params: &(impl Serialize + ?Sized)) -> Result<String, ApiError> {
    let value = serde_json::to_value(params)?;
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(String::new()),
        other => {
            return Err(ApiError::unknown(format!(
                "Query parameters must be an object, got {}",
                other
            )))
        }
    };

    // Field order is kept (serde_json `preserve_order`).
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in map.iter() {
        if value.is_null() {
            continue;
        }
        serializer.append_pair(key, &query_value(value));
    }
    Ok(serializer.finish())
}

/// Arrays become comma-separated lists; strings are sent unquoted.
fn query_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(query_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
