//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap a single attempt with its deadline
//! - Cancel the attempt cleanly on timeout
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities; the timer lives inside the returned
//!   future, so it is disarmed whenever that future completes or is dropped
//! - Dropping the inner future aborts any in-flight socket
//! - Timeout errors are distinct from other errors (408 / TIMEOUT)

use std::future::Future;
use std::time::Duration;

use crate::http::error::ApiError;

/// Run `fut` under `duration`, mapping expiry to the timeout [`ApiError`].
pub async fn with_timeout<F>(duration: Duration, fut: F) -> Result<F::Output, ApiError>
where
    F: Future,
{
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| ApiError::timeout())
}
