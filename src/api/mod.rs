//! Typed backend API services.
//!
//! # Data Flow
//! ```text
//! caller
//!     → service method (AuthApi, DashboardApi, ...)
//!     → base.rs (verb, query string, JSON body, per-call options)
//!     → RequestPipeline::execute
//!     → ResultEnvelope<typed payload> | ApiError
//! ```
//!
//! # Design Decisions
//! - Every service shares one `Arc<RequestPipeline>`
//! - Payloads are typed where the backend shape is known, `Value` otherwise

pub mod auth;
pub mod base;
pub mod baskets;
pub mod dashboard;
pub mod endpoints;
pub mod mandate;
pub mod subscription;
pub mod types;

use std::sync::Arc;

use crate::http::RequestPipeline;

pub use auth::AuthApi;
pub use base::{ApiService, RequestOptions};
pub use baskets::BasketsApi;
pub use dashboard::DashboardApi;
pub use mandate::MandateApi;
pub use subscription::SubscriptionApi;

/// All services over one pipeline.
#[derive(Debug, Clone)]
pub struct ApiServices {
    pub auth: AuthApi,
    pub dashboard: DashboardApi,
    pub baskets: BasketsApi,
    pub subscription: SubscriptionApi,
    pub mandate: MandateApi,
}

impl ApiServices {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self {
            auth: AuthApi::new(pipeline.clone()),
            dashboard: DashboardApi::new(pipeline.clone()),
            baskets: BasketsApi::new(pipeline.clone()),
            subscription: SubscriptionApi::new(pipeline.clone()),
            mandate: MandateApi::new(pipeline),
        }
    }
}
