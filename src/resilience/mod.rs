//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Each pipeline attempt:
//!     → timeouts.rs (per-attempt deadline, dropped on every exit path)
//!     → On failure: retries.rs (classify, decide, compute delay)
//!     → backoff.rs (linear delay: base * retry number)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Only transport failures and 5xx responses are retried
//! - 4xx and unexpected failures surface on first occurrence
//! - Backoff is linear and deterministic (no jitter)

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use backoff::linear_backoff;
pub use retries::{is_retryable, FailureKind, RetryPolicy};
pub use timeouts::with_timeout;
