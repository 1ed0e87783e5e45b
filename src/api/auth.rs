//! Authentication endpoints.

use serde_json::Value;
use std::sync::Arc;

use crate::api::base::{ApiService, RequestOptions};
use crate::api::endpoints;
use crate::api::types::{
    AccessTokenData, BackendEnvelope, LoginRequest, LoginResponse, OtpData, RefreshTokenRequest,
    SendOtpRequest, TokenData, VerifyOtpRequest,
};
use crate::http::{ApiError, RequestPipeline, ResultEnvelope};

/// OTP login, token refresh and profile calls.
///
/// Everything that runs before a token exists is sent with `skip_auth`.
#[derive(Debug, Clone)]
pub struct AuthApi {
    service: ApiService,
}

impl AuthApi {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        Self {
            service: ApiService::new(pipeline),
        }
    }

    pub async fn send_otp(
        &self,
        data: &SendOtpRequest,
    ) -> Result<ResultEnvelope<BackendEnvelope<Vec<OtpData>>>, ApiError> {
        self.service
            .post(endpoints::auth::SEND_OTP, data, RequestOptions::skip_auth())
            .await
    }

    pub async fn verify_otp(
        &self,
        data: &VerifyOtpRequest,
    ) -> Result<ResultEnvelope<BackendEnvelope<Vec<AccessTokenData>>>, ApiError> {
        self.service
            .post(endpoints::auth::VERIFY_OTP, data, RequestOptions::skip_auth())
            .await
    }

    pub async fn login(&self, data: &LoginRequest) -> Result<ResultEnvelope<LoginResponse>, ApiError> {
        self.service
            .post(endpoints::auth::LOGIN, data, RequestOptions::skip_auth())
            .await
    }

    pub async fn logout(&self) -> Result<ResultEnvelope<Value>, ApiError> {
        self.service
            .post_empty(endpoints::auth::LOGOUT, RequestOptions::default())
            .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<ResultEnvelope<TokenData>, ApiError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.service
            .post(endpoints::auth::REFRESH_TOKEN, &body, RequestOptions::skip_auth())
            .await
    }

    pub async fn profile(&self) -> Result<ResultEnvelope<Value>, ApiError> {
        self.service
            .get(endpoints::auth::PROFILE, RequestOptions::default())
            .await
    }
}
