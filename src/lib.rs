//! Client library for the basket investment backend.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller (CLI, UI layer)
//!        │
//!        ▼
//!   ┌──────────┐    ┌──────────────────────────────────────────────┐
//!   │   api    │───▶│              http::RequestPipeline            │
//!   │ services │    │  URL + headers → timeout → transport → decode │
//!   └──────────┘    │        ▲                        │             │
//!        ▲          │        └──── resilience ◀───────┘             │
//!        │          └───────┬──────────────────────────┬───────────┘
//!   ┌──────────┐            │ token                    │ 401
//!   │   auth   │◀───────────┘                          ▼
//!   │ session  │                         auth::storage cleared,
//!   └──────────┘                         auth::events Unauthorized
//! ```
//!
//! Cross-cutting: `config` (TOML), `observability` (tracing, metrics).

pub mod api;
pub mod auth;
pub mod config;
pub mod http;
pub mod observability;
pub mod resilience;

pub use config::ClientConfig;
pub use http::{ApiError, PipelineConfig, RequestDescriptor, RequestPipeline, ResultEnvelope};
