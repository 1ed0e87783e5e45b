//! Request pipeline.
//!
//! # Responsibilities
//! - Resolve URLs, inject headers and the bearer token
//! - Enforce the per-attempt timeout
//! - Retry transport failures and 5xx responses with linear backoff
//! - Normalize every outcome to `ResultEnvelope<T>` or `ApiError`
//! - Clear credentials and notify listeners on 401
//!
//! # Design Decisions
//! - Constructed explicitly and shared via `Arc`; no global instance
//! - Transport, credential store and event channel are injected
//! - The caller sees one terminal outcome; intermediate failures are logged

use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::auth::events::{AuthEvent, AuthEvents};
use crate::auth::storage::CredentialStore;
use crate::config::schema::ApiConfig;
use crate::http::error::{ApiError, TransportError};
use crate::http::request::{RequestDescriptor, RequestId};
use crate::http::response::{decode_success, error_from_response, ResultEnvelope};
use crate::http::transport::{ReqwestTransport, Transport, TransportRequest};
use crate::observability::metrics;
use crate::resilience::retries::{FailureKind, RetryPolicy};
use crate::resilience::timeouts::with_timeout;

/// Settings the pipeline runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl PipelineConfig {
    pub fn from_api_config(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            timeout: api.timeout(),
            retry: RetryPolicy::new(api.retry_attempts, api.retry_delay()),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_api_config(&ApiConfig::default())
    }
}

/// A failed attempt, classified for the retry decision.
#[derive(Debug)]
struct AttemptFailure {
    kind: FailureKind,
    error: ApiError,
}

impl AttemptFailure {
    fn unknown(error: ApiError) -> Self {
        Self {
            kind: FailureKind::Unknown,
            error,
        }
    }

    fn transport(error: TransportError) -> Self {
        let kind = match error {
            TransportError::Network(_) => FailureKind::Network,
            TransportError::Timeout => FailureKind::Timeout,
            TransportError::Other(_) => FailureKind::Unknown,
        };
        Self {
            kind,
            error: error.into(),
        }
    }
}

/// Single chokepoint for outbound calls to the backend.
pub struct RequestPipeline {
    config: PipelineConfig,
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    events: AuthEvents,
}

impl RequestPipeline {
    pub fn new(
        config: PipelineConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        events: AuthEvents,
    ) -> Self {
        tracing::debug!(
            base_url = %config.base_url,
            timeout = ?config.timeout,
            max_retries = config.retry.max_retries,
            "Request pipeline initialized"
        );
        Self {
            config,
            transport,
            store,
            events,
        }
    }

    /// Pipeline over the production `reqwest` transport.
    pub fn with_reqwest(
        config: PipelineConfig,
        store: Arc<dyn CredentialStore>,
        events: AuthEvents,
    ) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::new(config, Arc::new(transport), store, events))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    /// Run a call to completion, retrying as the policy allows.
    pub async fn execute<T>(&self, mut descriptor: RequestDescriptor) -> Result<ResultEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let request_id = RequestId::new();
        let method = descriptor.method.clone();
        let start = Instant::now();

        loop {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                url = %descriptor.url,
                attempt = descriptor.retry + 1,
                "Sending request"
            );

            let outcome = self.attempt::<T>(&descriptor, &request_id).await;
            match outcome {
                Ok(envelope) => {
                    metrics::record_request(method.as_str(), envelope.status, start);
                    return Ok(envelope);
                }
                Err(failure) => {
                    if self.config.retry.should_retry(descriptor.retry, failure.kind) {
                        let delay = self.config.retry.delay_for(descriptor.retry);
                        tracing::info!(
                            request_id = %request_id,
                            attempt = descriptor.retry + 1,
                            delay = ?delay,
                            reason = failure.kind.as_str(),
                            status = failure.error.status,
                            "Retrying request"
                        );
                        metrics::record_retry(failure.kind.as_str());
                        tokio::time::sleep(delay).await;
                        descriptor.retry += 1;
                        continue;
                    }

                    tracing::debug!(
                        request_id = %request_id,
                        status = failure.error.status,
                        code = ?failure.error.code,
                        retries = descriptor.retry,
                        "Request failed"
                    );
                    metrics::record_request(method.as_str(), failure.error.status, start);
                    return Err(failure.error);
                }
            }
        }
    }

    async fn attempt<T>(
        &self,
        descriptor: &RequestDescriptor,
        request_id: &RequestId,
    ) -> Result<ResultEnvelope<T>, AttemptFailure>
    where
        T: DeserializeOwned,
    {
        let request = self
            .build_request(descriptor, request_id)
            .map_err(AttemptFailure::unknown)?;

        let response = match with_timeout(self.config.timeout, self.transport.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(request_id = %request_id, error = %e, "Transport error");
                return Err(AttemptFailure::transport(e));
            }
            Err(timeout) => {
                tracing::warn!(request_id = %request_id, timeout = ?self.config.timeout, "Request timed out");
                return Err(AttemptFailure {
                    kind: FailureKind::Timeout,
                    error: timeout,
                });
            }
        };

        let status = response.status.as_u16();
        if !response.status.is_success() {
            self.on_error_status(status, request_id);
            return Err(AttemptFailure {
                kind: FailureKind::Status(status),
                error: error_from_response(&response),
            });
        }

        let data = decode_success::<T>(&response).map_err(AttemptFailure::unknown)?;
        Ok(ResultEnvelope::new(data, status))
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        request_id: &RequestId,
    ) -> Result<TransportRequest, ApiError> {
        let url = descriptor.resolve_url(&self.config.base_url)?;
        let token = if descriptor.skip_auth {
            None
        } else {
            self.store.token()
        };
        let headers = descriptor.build_headers(token.as_deref(), request_id)?;
        let body = descriptor
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()?;

        Ok(TransportRequest {
            method: descriptor.method.clone(),
            url,
            headers,
            body,
        })
    }

    fn on_error_status(&self, status: u16, request_id: &RequestId) {
        match status {
            401 => self.handle_unauthorized(request_id),
            403 => tracing::warn!(request_id = %request_id, "Access forbidden"),
            500 => tracing::error!(request_id = %request_id, "Server error occurred"),
            _ => {}
        }
    }

    fn handle_unauthorized(&self, request_id: &RequestId) {
        tracing::warn!(request_id = %request_id, "Unauthorized, clearing stored credentials");

        if let Err(e) = self.store.clear_token() {
            tracing::error!(error = %e, "Failed to clear stored token");
        }
        if let Err(e) = self.store.clear_profile() {
            tracing::error!(error = %e, "Failed to clear stored profile");
        }

        metrics::record_unauthorized();
        self.events.publish(AuthEvent::Unauthorized);
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .field("retry", &self.config.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStore;
    use futures_util::future::BoxFuture;
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use std::sync::Mutex;

    use crate::http::transport::TransportResponse;

    /// Records requests and answers every one with the same status.
    struct FixedTransport {
        status: StatusCode,
        seen: Mutex<Vec<TransportRequest>>,
    }

    impl Transport for FixedTransport {
        fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<TransportResponse, TransportError>> {
            self.seen.lock().unwrap().push(request);
            let status = self.status;
            Box::pin(async move {
                Ok(TransportResponse {
                    status,
                    headers: HeaderMap::new(),
                    body: b"ok".to_vec(),
                })
            })
        }
    }

    fn pipeline(status: u16) -> (RequestPipeline, Arc<FixedTransport>) {
        let transport = Arc::new(FixedTransport {
            status: StatusCode::from_u16(status).unwrap(),
            seen: Mutex::new(Vec::new()),
        });
        let config = PipelineConfig {
            base_url: "http://backend.test".into(),
            timeout: Duration::from_secs(1),
            retry: RetryPolicy::new(3, Duration::from_millis(10)),
        };
        let pipeline = RequestPipeline::new(
            config,
            transport.clone(),
            Arc::new(MemoryStore::with_token("t0k3n")),
            AuthEvents::new(),
        );
        (pipeline, transport)
    }

    #[tokio::test]
    async fn test_body_serialized_as_json() {
        let (pipeline, transport) = pipeline(200);
        let descriptor = RequestDescriptor::post("/investments/b1/subscribe")
            .with_body(serde_json::json!({"period": "weekly", "units": 10}));

        let envelope: ResultEnvelope<String> = pipeline.execute(descriptor).await.unwrap();
        assert_eq!(envelope.data, "ok");

        let seen = transport.seen.lock().unwrap();
        let body: serde_json::Value = serde_json::from_slice(seen[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["units"], 10);
        assert_eq!(seen[0].url.as_str(), "http://backend.test/investments/b1/subscribe");
        assert_eq!(seen[0].headers["authorization"], "Bearer t0k3n");
    }

    #[tokio::test]
    async fn test_request_id_stable_across_retries() {
        let (pipeline, transport) = pipeline(503);
        let err = pipeline
            .execute::<String>(RequestDescriptor::get("/baskets"))
            .await
            .unwrap_err();
        assert_eq!(err.status, 503);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        let first = &seen[0].headers["x-request-id"];
        assert!(seen.iter().all(|r| &r.headers["x-request-id"] == first));
    }

    #[tokio::test]
    async fn test_invalid_url_not_retried() {
        let (pipeline, transport) = pipeline(200);
        let err = pipeline
            .execute::<String>(RequestDescriptor::get("http://[::1"))
            .await
            .unwrap_err();

        assert!(err.is_unknown());
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_initial_retry_counter_is_honored() {
        let (pipeline, transport) = pipeline(500);
        let mut descriptor = RequestDescriptor::get("/baskets");
        descriptor.retry = 2;

        assert!(pipeline.execute::<String>(descriptor).await.is_err());
        assert_eq!(transport.seen.lock().unwrap().len(), 2);
    }
}
