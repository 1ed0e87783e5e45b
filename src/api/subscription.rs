//! Subscription plan endpoints.

use serde_json::Value;
use std::sync::Arc;

use crate::api::base::{ApiService, RequestOptions};
use crate::api::endpoints;
use crate::api::types::{Period, SubscribeRequest};
use crate::http::{ApiError, RequestPipeline, ResultEnvelope};

#[derive(Debug, Clone)]
pub struct SubscriptionApi {
    service: ApiService,
}

impl SubscriptionApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self {
            service: ApiService::new(pipeline),
        }
    }

    pub async fn subscribe(&self, data: &SubscribeRequest) -> Result<ResultEnvelope<Value>, ApiError> {
        self.service
            .post(endpoints::subscription::SUBSCRIBE, data, RequestOptions::default())
            .await
    }

    /// Price history of a basket over a period, as served to the chart view.
    pub async fn graph_data(&self, basket_id: &str, period: Period) -> Result<ResultEnvelope<Value>, ApiError> {
        self.service
            .get(
                &endpoints::baskets::chart(basket_id, period.as_str()),
                RequestOptions::default(),
            )
            .await
    }
}
