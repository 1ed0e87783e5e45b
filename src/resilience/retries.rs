//! Retry logic.
//!
//! # Responsibilities
//! - Classify a failed attempt
//! - Decide whether another attempt is allowed
//! - Compute the delay before it
//!
//! # Design Decisions
//! - Timeouts and network errors are always retryable
//! - HTTP 500-599 are retryable, every other status is terminal
//! - `max_retries` counts attempts beyond the first one

use std::time::Duration;

use crate::resilience::backoff::linear_backoff;

/// What went wrong in a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The attempt exceeded its deadline and was cancelled.
    Timeout,
    /// The backend could not be reached.
    Network,
    /// The backend answered with a non-2xx status.
    Status(u16),
    /// Anything else (bad URL, undecodable body, ...).
    Unknown,
}

impl FailureKind {
    /// Label used for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::Network => "network",
            FailureKind::Status(_) => "status",
            FailureKind::Unknown => "unknown",
        }
    }
}

/// Whether a failure of this kind may be retried at all.
pub fn is_retryable(kind: FailureKind) -> bool {
    match kind {
        FailureKind::Timeout | FailureKind::Network => true,
        FailureKind::Status(status) => (500..600).contains(&status),
        FailureKind::Unknown => false,
    }
}

/// Fixed-count retry policy with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// `retries_done` is how many retries have already been issued.
    pub fn should_retry(&self, retries_done: u32, kind: FailureKind) -> bool {
        retries_done < self.max_retries && is_retryable(kind)
    }

    /// Delay before issuing retry number `retries_done + 1`.
    pub fn delay_for(&self, retries_done: u32) -> Duration {
        linear_backoff(retries_done.saturating_add(1), self.base_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(is_retryable(FailureKind::Timeout));
        assert!(is_retryable(FailureKind::Network));
        assert!(is_retryable(FailureKind::Status(500)));
        assert!(is_retryable(FailureKind::Status(503)));
        assert!(is_retryable(FailureKind::Status(599)));
        assert!(!is_retryable(FailureKind::Status(600)));
        assert!(!is_retryable(FailureKind::Status(400)));
        assert!(!is_retryable(FailureKind::Status(401)));
        assert!(!is_retryable(FailureKind::Status(408)));
        assert!(!is_retryable(FailureKind::Status(429)));
        assert!(!is_retryable(FailureKind::Unknown));
    }

    #[test]
    fn test_policy_exhaustion() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        assert!(policy.should_retry(0, FailureKind::Status(502)));
        assert!(policy.should_retry(2, FailureKind::Status(502)));
        assert!(!policy.should_retry(3, FailureKind::Status(502)));
        assert!(!policy.should_retry(0, FailureKind::Status(404)));
    }

    #[test]
    fn test_policy_delays_are_linear() {
        let policy = RetryPolicy::new(3, Duration::from_millis(250));
        assert_eq!(policy.delay_for(0), Duration::from_millis(250));
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(750));
    }

    #[test]
    fn test_none_policy() {
        assert!(!RetryPolicy::none().should_retry(0, FailureKind::Network));
    }
}
