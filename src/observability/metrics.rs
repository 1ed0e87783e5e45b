//! Metrics collection.
//!
//! # Metrics
//! - `client_requests_total` (counter): finished calls by method, status
//! - `client_request_duration_seconds` (histogram): call latency, retries included
//! - `client_retries_total` (counter): retries by failure reason
//! - `client_unauthorized_total` (counter): 401 responses that cleared credentials

use std::time::Instant;

/// Record a finished call (success or terminal error).
pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "client_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "client_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a retry about to be issued.
pub fn record_retry(reason: &'static str) {
    metrics::counter!("client_retries_total", "reason" => reason).increment(1);
}

/// Record a 401 that cleared stored credentials.
pub fn record_unauthorized() {
    metrics::counter!("client_unauthorized_total").increment(1);
}
