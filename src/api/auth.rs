//! Authentication endpoints (`/auth/*`)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{fail, ApiError};
use crate::auth::{Credential, Role};
use crate::gateway::{Gateway, RequestContext, REFRESH_PATH};
use crate::security::Sanitizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    #[default]
    Password,
    Otp,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub login_method: LoginMethod,
}

impl LoginRequest {
    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Some(password.into()),
            login_method: LoginMethod::Password,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleProfile {
    pub email: String,
    pub name: String,
    pub google_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    code: &'a str,
}

/// Account summary returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl AuthUser {
    /// Username, else the email address
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: AuthUser,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl AuthResponse {
    pub fn credential(&self) -> Credential {
        Credential::new(self.access_token.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpResponse {
    #[serde(default = "default_otp_message")]
    pub message: String,
    /// Seconds until the code expires
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn default_otp_message() -> String {
    "OTP sent to your email".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    user: AuthUser,
}

/// Client for the `/auth` endpoints
#[derive(Clone)]
pub struct AuthApi {
    gateway: Arc<Gateway>,
}

impl AuthApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Creates an account; the backend then mails a verification code
    pub async fn register(&self, signup: &SignupRequest) -> Result<String, ApiError> {
        let request = RequestContext::post("/auth/register")
            .json(signup)
            .map_err(fail("Registration failed"))?;
        self.gateway
            .send(request)
            .await
            .map_err(fail("Registration failed"))?;

        tracing::info!("Registered {}", Sanitizer::sanitize_email(&signup.email));
        Ok("Registration successful. Please check your email for OTP.".to_string())
    }

    pub async fn send_otp(&self, email: &str) -> Result<OtpResponse, ApiError> {
        let request = RequestContext::post("/auth/send-otp")
            .json(&serde_json::json!({ "email": email }))
            .map_err(fail("Failed to send OTP"))?;
        let response = self
            .gateway
            .send_json(request)
            .await
            .map_err(fail("Failed to send OTP"))?;

        tracing::debug!("OTP sent to {}", Sanitizer::sanitize_email(email));
        Ok(response)
    }

    /// Confirms the signup code and signs the account in
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<AuthResponse, ApiError> {
        self.post_otp("/auth/verify-otp", email, code, "OTP verification failed")
            .await
    }

    pub async fn login(&self, login: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let request = RequestContext::post("/auth/login")
            .json(login)
            .map_err(fail("Login failed"))?;
        self.gateway
            .send_json(request)
            .await
            .map_err(fail("Login failed"))
    }

    pub async fn login_otp(&self, email: &str, code: &str) -> Result<AuthResponse, ApiError> {
        self.post_otp("/auth/login-otp", email, code, "OTP login failed")
            .await
    }

    pub async fn google(&self, profile: &GoogleProfile) -> Result<AuthResponse, ApiError> {
        let request = RequestContext::post("/auth/google")
            .json(profile)
            .map_err(fail("Google login failed"))?;
        self.gateway
            .send_json(request)
            .await
            .map_err(fail("Google login failed"))
    }

    /// Explicit token refresh
    ///
    /// Returns the new access token without persisting it.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let body: TokenResponse = self
            .gateway
            .send_json(RequestContext::post(REFRESH_PATH))
            .await
            .map_err(fail("Token refresh failed"))?;
        Ok(body.access_token)
    }

    /// Sets a password on an account created through Google
    pub async fn set_password(&self, email: &str, password: &str) -> Result<MessageResponse, ApiError> {
        let request = RequestContext::post("/auth/set-password")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .map_err(fail("Failed to set password"))?;
        self.gateway
            .send_json(request)
            .await
            .map_err(fail("Failed to set password"))
    }

    pub async fn me(&self) -> Result<AuthUser, ApiError> {
        let body: MeResponse = self
            .gateway
            .send_json(RequestContext::get("/auth/me"))
            .await
            .map_err(fail("Failed to load profile"))?;
        Ok(body.user)
    }

    async fn post_otp(
        &self,
        path: &str,
        email: &str,
        code: &str,
        fallback: &'static str,
    ) -> Result<AuthResponse, ApiError> {
        let request = RequestContext::post(path)
            .json(&OtpRequest { email, code })
            .map_err(fail(fallback))?;
        self.gateway.send_json(request).await.map_err(fail(fallback))
    }
}
