//! Dashboard endpoints: basket listing, detail, subscription, investments.

use std::sync::Arc;

use crate::api::base::{ApiService, RequestOptions};
use crate::api::endpoints;
use crate::api::types::{BackendEnvelope, Basket, Investment, SubscriptionRequest, SubscriptionResult};
use crate::http::{ApiError, RequestPipeline, ResultEnvelope};

#[derive(Debug, Clone)]
pub struct DashboardApi {
    service: ApiService,
}

impl DashboardApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self {
            service: ApiService::new(pipeline),
        }
    }

    pub async fn baskets(&self) -> Result<ResultEnvelope<BackendEnvelope<Vec<Basket>>>, ApiError> {
        self.service
            .get(endpoints::baskets::LIST, RequestOptions::default())
            .await
    }

    pub async fn basket_details(
        &self,
        basket_id: &str,
    ) -> Result<ResultEnvelope<BackendEnvelope<Vec<Basket>>>, ApiError> {
        self.service
            .get(&endpoints::baskets::detail(basket_id), RequestOptions::default())
            .await
    }

    /// Subscribe to a basket with a period and unit count.
    pub async fn subscribe_to_basket(
        &self,
        basket_id: &str,
        data: &SubscriptionRequest,
    ) -> Result<ResultEnvelope<BackendEnvelope<Vec<SubscriptionResult>>>, ApiError> {
        self.service
            .post(
                &endpoints::investments::subscribe(basket_id),
                data,
                RequestOptions::default(),
            )
            .await
    }

    pub async fn investments(&self) -> Result<ResultEnvelope<BackendEnvelope<Vec<Investment>>>, ApiError> {
        self.service
            .get(endpoints::investments::LIST, RequestOptions::default())
            .await
    }
}
