//! Linear backoff.

use std::time::Duration;

/// Delay before the given retry: `base * attempt`.
///
/// `attempt` is 1-based; attempt 0 means "no retry yet" and waits nothing.
pub fn linear_backoff(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(attempt)
}
