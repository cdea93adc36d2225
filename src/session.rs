//! Session provider
//!
//! Tracks the signed-in user on top of the gateway. Login flows persist the
//! returned access token through the gateway's credential store; logout
//! opens the gateway's logout window so in-flight 401s do not trigger a
//! refresh or a redirect.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::api::{
    ApiError, AuthApi, AuthResponse, AuthUser, CheckoutSession, GoogleProfile, LoginRequest,
    PlansApi,
};
use crate::auth::{Role, StorageError};
use crate::gateway::{Gateway, GatewayError};
use crate::routing::{landing_path, SessionInfo};
use crate::security::Sanitizer;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Please sign in to subscribe to a plan")]
    NotAuthenticated,

    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Signed-in user and the flows that change it
pub struct SessionManager {
    gateway: Arc<Gateway>,
    auth: AuthApi,
    plans: PlansApi,
    user: RwLock<Option<AuthUser>>,
}

impl SessionManager {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            auth: AuthApi::new(gateway.clone()),
            plans: PlansApi::new(gateway.clone()),
            gateway,
            user: RwLock::new(None),
        }
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<AuthUser, SessionError> {
        let response = self
            .auth
            .login(&LoginRequest::password(email, password))
            .await?;
        self.establish(response).await
    }

    pub async fn login_with_otp(&self, email: &str, code: &str) -> Result<AuthUser, SessionError> {
        let response = self.auth.login_otp(email, code).await?;
        self.establish(response).await
    }

    /// Completes signup by confirming the mailed code
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<AuthUser, SessionError> {
        let response = self.auth.verify_otp(email, code).await?;
        self.establish(response).await
    }

    pub async fn login_with_google(&self, profile: &GoogleProfile) -> Result<AuthUser, SessionError> {
        let response = self.auth.google(profile).await?;
        self.establish(response).await
    }

    /// Picks up a persisted credential from a previous run
    ///
    /// Returns `None` when nothing is stored. A stored but rejected
    /// credential surfaces as an error after the gateway's refresh attempt.
    pub async fn restore(&self) -> Result<Option<AuthUser>, SessionError> {
        if self.gateway.credentials().current().await?.is_none() {
            return Ok(None);
        }

        let user = self.auth.me().await?;
        tracing::info!("Restored session for {}", Sanitizer::sanitize_email(&user.email));
        *self.user.write().await = Some(user.clone());
        Ok(Some(user))
    }

    /// Signs out locally
    ///
    /// Clears the stored credential and the user. Requests still in flight
    /// during the logout window fail without refreshing or redirecting.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let result = self.gateway.logout().await;
        *self.user.write().await = None;
        result.map_err(SessionError::from)
    }

    pub async fn user(&self) -> Option<AuthUser> {
        self.user.read().await.clone()
    }

    pub async fn set_user(&self, user: AuthUser) {
        *self.user.write().await = Some(user);
    }

    /// Whether a user is signed in and still holds a credential
    ///
    /// The gateway drops the credential when a refresh fails; the cached
    /// user goes with it.
    pub async fn is_authenticated(&self) -> bool {
        if self.user.read().await.is_none() {
            return false;
        }

        match self.gateway.credentials().current().await {
            Ok(Some(_)) => true,
            Ok(None) => {
                tracing::info!("Credential gone, dropping the signed-in user");
                *self.user.write().await = None;
                false
            }
            Err(e) => {
                tracing::warn!("Failed to read credential: {}", e);
                false
            }
        }
    }

    /// Role of the signed-in user
    ///
    /// Falls back to the role claim of the stored token when the backend
    /// did not include one with the user.
    pub async fn role(&self) -> Option<Role> {
        let user_role = self.user.read().await.as_ref().and_then(|u| u.role);
        if user_role.is_some() {
            return user_role;
        }

        match self.gateway.credentials().current().await {
            Ok(Some(credential)) => credential.role(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read credential: {}", e);
                None
            }
        }
    }

    /// Unlocalized page to land on after signing in
    pub async fn landing_path(&self) -> &'static str {
        landing_path(self.role().await)
    }

    /// What the route guard needs to know
    pub async fn snapshot(&self) -> SessionInfo {
        if !self.is_authenticated().await {
            return SessionInfo::anonymous();
        }
        SessionInfo {
            authenticated: true,
            role: self.role().await,
        }
    }

    /// Starts a checkout for the signed-in user
    pub async fn subscribe(&self, plan_id: u64) -> Result<CheckoutSession, SessionError> {
        let email = self
            .user
            .read()
            .await
            .as_ref()
            .map(|u| u.email.clone())
            .filter(|e| !e.is_empty())
            .ok_or(SessionError::NotAuthenticated)?;

        Ok(self.plans.checkout(plan_id, &email).await?)
    }

    async fn establish(&self, response: AuthResponse) -> Result<AuthUser, SessionError> {
        let credential = response.credential();
        self.gateway.credentials().persist(&credential).await?;

        let mut user = response.user;
        if user.role.is_none() {
            user.role = credential.role();
        }

        tracing::info!(
            "Signed in as {} ({})",
            Sanitizer::sanitize_email(&user.email),
            user.role.unwrap_or_default()
        );
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }
}
