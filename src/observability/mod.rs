//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline and services produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → stderr (fmt layer, filtered by RUST_LOG or config)
//!     → any metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a call
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
