//! Request description, gateway state and errors

use reqwest::{Method, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::auth::StorageError;

/// Path of the token refresh endpoint
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Errors reported by [`Gateway::send`](super::Gateway::send)
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network unreachable, timeout, or a malformed request
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("HTTP {status}{}", message_suffix(.message))]
    Status { status: StatusCode, message: String },

    /// A 401 could not be recovered because the refresh call failed
    #[error("Session expired: {0}")]
    RefreshFailed(#[source] Box<GatewayError>),

    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A refresh completed after logout started; its token was discarded
    #[error("Logged out during token refresh")]
    LoggedOut,
}

impl GatewayError {
    /// HTTP status of the failure, looking through a failed refresh
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::RefreshFailed(inner) => inner.status(),
            GatewayError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    /// Backend-provided message, if the failure carried one
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            GatewayError::Status { message, .. } if !message.is_empty() => Some(message),
            GatewayError::RefreshFailed(inner) => inner.backend_message(),
            _ => None,
        }
    }
}

fn message_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

/// Extracts the `message` field of the backend's error envelope
///
/// Validation failures carry a list of messages; they are joined. Plain
/// text bodies are kept verbatim, anything else yields an empty message.
pub(crate) fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed.as_ref().and_then(|v| v.get("message"));

    match message {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|i| i.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ if !body.trim().is_empty() && parsed.is_none() => body.trim().to_string(),
        _ => String::new(),
    }
}

/// An outbound call to the backend
///
/// Carries a retry marker so a request is retried at most once after a
/// token refresh.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    headers: Vec<(String, String)>,
    retried: bool,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attaches a JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, GatewayError> {
        let value = serde_json::to_value(body)
            .map_err(|e| GatewayError::InvalidRequest(format!("Failed to encode body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub fn is_refresh_call(&self) -> bool {
        self.path.contains(REFRESH_PATH)
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }
}

/// Refresh/logout state owned by one gateway
///
/// `LoggingOut` remembers whether a refresh was already in flight when the
/// logout window opened, so a refresh can never start twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayState {
    #[default]
    Normal,
    Refreshing,
    LoggingOut { refreshing: bool },
}

impl GatewayState {
    pub fn is_refreshing(&self) -> bool {
        matches!(
            self,
            GatewayState::Refreshing | GatewayState::LoggingOut { refreshing: true }
        )
    }

    pub fn is_logging_out(&self) -> bool {
        matches!(self, GatewayState::LoggingOut { .. })
    }

    /// Only `Normal` may start a refresh
    pub fn begin_refresh(self) -> Option<Self> {
        match self {
            GatewayState::Normal => Some(GatewayState::Refreshing),
            _ => None,
        }
    }

    pub fn finish_refresh(self) -> Self {
        match self {
            GatewayState::Refreshing => GatewayState::Normal,
            GatewayState::LoggingOut { .. } => GatewayState::LoggingOut { refreshing: false },
            GatewayState::Normal => GatewayState::Normal,
        }
    }

    pub fn begin_logout(self) -> Self {
        GatewayState::LoggingOut {
            refreshing: self.is_refreshing(),
        }
    }

    pub fn end_logout(self) -> Self {
        match self {
            GatewayState::LoggingOut { refreshing: true } => GatewayState::Refreshing,
            GatewayState::LoggingOut { refreshing: false } => GatewayState::Normal,
            other => other,
        }
    }
}
