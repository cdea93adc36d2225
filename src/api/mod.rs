//! API module - Typed endpoints of the Retrader backend
//!
//! Each endpoint goes through the [`Gateway`](crate::gateway::Gateway) and
//! maps failures to an [`ApiError`] carrying a user-facing message.

mod auth;
mod plans;
mod users;

pub use auth::{
    AuthApi, AuthResponse, AuthUser, GoogleProfile, LoginMethod, LoginRequest, MessageResponse,
    OtpResponse, SignupRequest,
};
pub use plans::{format_price, CheckoutSession, Plan, PlanInterval, PlansApi};
pub use users::{filter_users, AdminUser, RoleFilter, UsersApi};

use reqwest::StatusCode;
use thiserror::Error;

use crate::gateway::GatewayError;

/// Failure of a backend endpoint
///
/// The message is the backend's own when it sent one, otherwise the
/// endpoint's fixed fallback ("Login failed", "Failed to send OTP", ...).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
    #[source]
    source: GatewayError,
}

impl ApiError {
    pub fn new(source: GatewayError, fallback: &str) -> Self {
        let message = source
            .backend_message()
            .unwrap_or(fallback)
            .to_string();
        Self { message, source }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn gateway_error(&self) -> &GatewayError {
        &self.source
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.source.status()
    }

    /// The credential could not be refreshed and the session is gone
    pub fn is_session_expired(&self) -> bool {
        matches!(self.source, GatewayError::RefreshFailed(_))
    }
}

/// `map_err` adapter attaching an endpoint fallback message
pub(crate) fn fail(fallback: &'static str) -> impl FnOnce(GatewayError) -> ApiError {
    move |source| ApiError::new(source, fallback)
}
