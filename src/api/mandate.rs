//! Payment mandate endpoints.

use serde_json::Value;
use std::sync::Arc;

use crate::api::base::{ApiService, RequestOptions};
use crate::api::endpoints;
use crate::api::types::{
    CreateMandateRequest, Mandate, PaginatedResponse, PaginationParams, UpdateMandateRequest,
};
use crate::http::{ApiError, RequestPipeline, ResultEnvelope};

#[derive(Debug, Clone)]
pub struct MandateApi {
    service: ApiService,
}

impl MandateApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self {
            service: ApiService::new(pipeline),
        }
    }

    pub async fn list(
        &self,
        params: &PaginationParams,
    ) -> Result<ResultEnvelope<PaginatedResponse<Mandate>>, ApiError> {
        self.service
            .get_with_query(endpoints::mandate::LIST, params, RequestOptions::default())
            .await
    }

    pub async fn get(&self, id: &str) -> Result<ResultEnvelope<Mandate>, ApiError> {
        self.service
            .get(&endpoints::mandate::item(id), RequestOptions::default())
            .await
    }

    pub async fn create(&self, data: &CreateMandateRequest) -> Result<ResultEnvelope<Mandate>, ApiError> {
        self.service
            .post(endpoints::mandate::LIST, data, RequestOptions::default())
            .await
    }

    pub async fn update(
        &self,
        id: &str,
        data: &UpdateMandateRequest,
    ) -> Result<ResultEnvelope<Mandate>, ApiError> {
        self.service
            .put(&endpoints::mandate::item(id), data, RequestOptions::default())
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<ResultEnvelope<Value>, ApiError> {
        self.service
            .delete(&endpoints::mandate::item(id), RequestOptions::default())
            .await
    }
}
