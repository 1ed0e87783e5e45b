//! Basket endpoints.

use serde_json::Value;
use std::sync::Arc;

use crate::api::base::{ApiService, RequestOptions};
use crate::api::endpoints;
use crate::api::types::{BackendEnvelope, Basket, InvestRequest};
use crate::http::{ApiError, RequestPipeline, ResultEnvelope};

#[derive(Debug, Clone)]
pub struct BasketsApi {
    service: ApiService,
}

impl BasketsApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self {
            service: ApiService::new(pipeline),
        }
    }

    pub async fn all(&self) -> Result<ResultEnvelope<BackendEnvelope<Vec<Basket>>>, ApiError> {
        self.service
            .get(endpoints::baskets::LIST, RequestOptions::default())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<ResultEnvelope<Basket>, ApiError> {
        self.service
            .get(&endpoints::baskets::get(id), RequestOptions::default())
            .await
    }

    pub async fn invest(&self, basket_id: &str, amount: f64) -> Result<ResultEnvelope<Value>, ApiError> {
        self.service
            .post(
                &endpoints::baskets::invest(basket_id),
                &InvestRequest { amount },
                RequestOptions::default(),
            )
            .await
    }
}
