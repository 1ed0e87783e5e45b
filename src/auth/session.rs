//! Two-step OTP login.
//!
//! # Flow
//! ```text
//! EnterMobile --send_otp(mobile)--> VerifyOtp { mobile } --verify_otp(otp)--> Complete
//!      ^                                   |
//!      +------------- reset() -------------+
//! ```
//!
//! Input is validated locally before any request is made.

use std::sync::Arc;
use thiserror::Error;

use crate::api::auth::AuthApi;
use crate::api::types::{SendOtpRequest, VerifyOtpRequest};
use crate::auth::storage::{CredentialStore, StorageError, UserProfile};
use crate::http::{ApiError, RequestPipeline};

pub const MOBILE_LEN: usize = 10;
pub const OTP_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Please enter a valid 10-digit mobile number")]
    InvalidMobile,

    #[error("Please enter valid 6-digit OTP")]
    InvalidOtp,

    #[error("Request an OTP before verifying")]
    OtpNotRequested,

    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),

    #[error("Failed to store credentials: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStep {
    EnterMobile,
    VerifyOtp { mobile: String },
    Complete,
}

pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == MOBILE_LEN && mobile.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_otp(otp: &str) -> bool {
    otp.len() == OTP_LEN && otp.bytes().all(|b| b.is_ascii_digit())
}

/// Drives the OTP login against the backend and stores the resulting credentials.
pub struct LoginFlow {
    auth: AuthApi,
    store: Arc<dyn CredentialStore>,
    step: LoginStep,
}

impl LoginFlow {
    pub fn new(pipeline: Arc<RequestPipeline>) -> Self {
        let store = pipeline.store().clone();
        Self {
            auth: AuthApi::new(pipeline),
            store,
            step: LoginStep::EnterMobile,
        }
    }

    /// Resume at the verify step for a mobile number an OTP was already sent to.
    pub fn awaiting_otp(pipeline: Arc<RequestPipeline>, mobile: &str) -> Result<Self, LoginError> {
        if !is_valid_mobile(mobile) {
            return Err(LoginError::InvalidMobile);
        }
        let mut flow = Self::new(pipeline);
        flow.step = LoginStep::VerifyOtp {
            mobile: mobile.to_string(),
        };
        Ok(flow)
    }

    pub fn step(&self) -> &LoginStep {
        &self.step
    }

    /// Step 1. Returns the OTP echoed by the backend.
    pub async fn send_otp(&mut self, mobile: &str) -> Result<String, LoginError> {
        if !is_valid_mobile(mobile) {
            return Err(LoginError::InvalidMobile);
        }

        let response = self
            .auth
            .send_otp(&SendOtpRequest {
                mobile: mobile.to_string(),
            })
            .await?
            .into_data();

        if !response.is_success() {
            return Err(LoginError::UnexpectedResponse(format!("status '{}'", response.status)));
        }
        let otp = response
            .data
            .into_iter()
            .next()
            .map(|d| d.otp)
            .ok_or_else(|| LoginError::UnexpectedResponse("no OTP in response".to_string()))?;

        tracing::info!(mobile = %mobile, "OTP sent");
        self.step = LoginStep::VerifyOtp {
            mobile: mobile.to_string(),
        };
        Ok(otp)
    }

    /// Step 2. Stores the access token and a profile for the mobile number.
    pub async fn verify_otp(&mut self, otp: &str) -> Result<UserProfile, LoginError> {
        let mobile = match &self.step {
            LoginStep::VerifyOtp { mobile } => mobile.clone(),
            _ => return Err(LoginError::OtpNotRequested),
        };
        if !is_valid_otp(otp) {
            return Err(LoginError::InvalidOtp);
        }

        let response = self
            .auth
            .verify_otp(&VerifyOtpRequest {
                mobile: mobile.clone(),
                otp: otp.to_string(),
            })
            .await?
            .into_data();

        if !response.is_success() {
            return Err(LoginError::UnexpectedResponse(format!("status '{}'", response.status)));
        }
        let token = response
            .data
            .into_iter()
            .next()
            .map(|d| d.access_token)
            .ok_or_else(|| LoginError::UnexpectedResponse("no access token in response".to_string()))?;

        // The backend has no profile endpoint wired to OTP login yet.
        let profile = UserProfile {
            id: "1".to_string(),
            name: "User".to_string(),
            email: String::new(),
            mobile,
        };

        self.store.set_token(&token)?;
        self.store.set_profile(&profile)?;
        self.step = LoginStep::Complete;

        tracing::info!(mobile = %profile.mobile, "Login complete");
        Ok(profile)
    }

    /// Back to step 1 (e.g. to change the mobile number).
    pub fn reset(&mut self) {
        self.step = LoginStep::EnterMobile;
    }
}

/// Whether a user is signed in.
pub fn is_authenticated(store: &dyn CredentialStore) -> bool {
    store.profile().is_some()
}

/// Forget the stored token and profile.
pub fn logout(store: &dyn CredentialStore) -> Result<(), StorageError> {
    store.clear_profile()?;
    store.clear_token()?;
    tracing::info!("Logged out");
    Ok(())
}
