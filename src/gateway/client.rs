//! Authenticated request gateway
//!
//! Every backend call goes through [`Gateway::send`], which attaches the
//! stored bearer token and recovers from a single expired-token 401 by
//! refreshing the credential and replaying the request once.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::base::{error_message, GatewayError, GatewayState, RequestContext, REFRESH_PATH};
use crate::auth::{Credential, CredentialStore, SessionCookie, TokenStorage};
use crate::config::AppConfig;
use crate::routing::{extract_locale, localized_url, Locale, Navigator};
use crate::security::Sanitizer;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

/// Gateway to the backend API
///
/// One instance owns the refresh/logout state; share it through `Arc`.
pub struct Gateway {
    client: Client,
    base_url: Url,
    credentials: CredentialStore,
    navigator: Arc<dyn Navigator>,
    state: Arc<RwLock<GatewayState>>,
    default_locale: Locale,
    logout_grace: Duration,
    logout_timer: Mutex<Option<CancellationToken>>,
}

impl Gateway {
    /// Builds a gateway for the configured backend
    ///
    /// `local` is the local token slot; the cookie half of the credential
    /// store is bound to the API origin.
    pub fn new(
        config: &AppConfig,
        local: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, GatewayError> {
        let base_url: Url = config
            .api_base_url
            .parse()
            .map_err(|e| GatewayError::InvalidRequest(format!("Invalid API URL: {}", e)))?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.request_timeout())
            .build()?;

        let cookie = SessionCookie::new(jar, base_url.clone());

        Ok(Self {
            client,
            base_url,
            credentials: CredentialStore::new(local, cookie),
            navigator,
            state: Arc::new(RwLock::new(GatewayState::Normal)),
            default_locale: config.default_locale,
            logout_grace: config.logout_grace(),
            logout_timer: Mutex::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn logout_grace(&self) -> Duration {
        self.logout_grace
    }

    pub async fn state(&self) -> GatewayState {
        *self.state.read().await
    }

    /// Sends a request, refreshing the credential once on a 401
    pub async fn send(&self, mut request: RequestContext) -> Result<Response, GatewayError> {
        let credential = self.credentials.current().await?;

        let error = match self.dispatch(&request, credential.as_ref()).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };

        if !error.is_unauthorized() || request.is_refresh_call() || request.is_retried() {
            return Err(error);
        }

        {
            let mut state = self.state.write().await;
            match state.begin_refresh() {
                Some(next) => *state = next,
                None => {
                    tracing::debug!(
                        "Not refreshing for {} {} ({:?})",
                        request.method(),
                        request.path(),
                        *state
                    );
                    return Err(error);
                }
            }
        }

        let refreshing = RefreshGuard::new(Arc::clone(&self.state));
        request.mark_retried();

        match self.refresh().await {
            Ok(fresh) => {
                let result = self.dispatch(&request, Some(&fresh)).await;
                refreshing.finish().await;
                result
            }
            Err(refresh_error) => {
                let logging_out = refreshing.finish().await.is_logging_out();
                tracing::warn!("Token refresh failed: {}", refresh_error);
                if !logging_out {
                    self.expire_session().await;
                }
                Err(GatewayError::RefreshFailed(Box::new(refresh_error)))
            }
        }
    }

    /// [`send`](Self::send) and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestContext,
    ) -> Result<T, GatewayError> {
        let path = request.path().to_string();
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(format!("{}: {}", path, e)))
    }

    /// Opens the logout window; no refresh is attempted while it is open
    pub async fn begin_logout(&self) {
        let mut state = self.state.write().await;
        *state = state.begin_logout();
        tracing::debug!("Logout window opened");
    }

    /// Closes the logout window and cancels any pending timer
    pub async fn end_logout(&self) {
        let pending = self.timer_slot().take();
        if let Some(timer) = pending {
            timer.cancel();
        }
        let mut state = self.state.write().await;
        *state = state.end_logout();
        tracing::debug!("Logout window closed");
    }

    /// Closes the logout window after `after`
    ///
    /// A later call replaces the pending timer, so the window always lasts
    /// the full period after the most recent logout. This is a heuristic:
    /// requests still in flight after the period may trigger a refresh.
    pub fn schedule_logout_end(&self, after: Duration) {
        let token = CancellationToken::new();
        if let Some(previous) = self.timer_slot().replace(token.clone()) {
            previous.cancel();
        }

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(after) => {
                    let mut state = state.write().await;
                    *state = state.end_logout();
                    tracing::debug!("Logout window closed after {:?}", after);
                }
                _ = token.cancelled() => {}
            }
        });
    }

    /// Logs out locally: opens the window, clears the credential, and
    /// closes the window after the configured grace period
    pub async fn logout(&self) -> Result<(), GatewayError> {
        self.begin_logout().await;
        let cleared = self.credentials.clear().await;
        self.schedule_logout_end(self.logout_grace);
        tracing::info!("Logged out");
        cleared.map_err(GatewayError::from)
    }

    async fn dispatch(
        &self,
        request: &RequestContext,
        credential: Option<&Credential>,
    ) -> Result<Response, GatewayError> {
        let url = self.url_for(request.path());
        let mut builder = self.client.request(request.method().clone(), url.as_str());

        if let Some(credential) = credential {
            builder = builder.header(AUTHORIZATION, credential.bearer());
        }
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        tracing::debug!(
            "{} {} (auth: {})",
            request.method(),
            Sanitizer::sanitize_url(&url),
            credential.map_or_else(|| "none".to_string(), |c| Sanitizer::sanitize_token(c.token()))
        );

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() || status.is_redirection() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("{} {} -> {}", request.method(), request.path(), status);
        Err(GatewayError::Status {
            status,
            message: error_message(&body),
        })
    }

    async fn refresh(&self) -> Result<Credential, GatewayError> {
        tracing::info!("Access token rejected, refreshing");

        let current = self.credentials.current().await?;
        let response = self
            .dispatch(&RequestContext::post(REFRESH_PATH), current.as_ref())
            .await?;

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(format!("{}: {}", REFRESH_PATH, e)))?;

        let fresh = Credential::new(body.access_token);

        // Held across persist so a concurrent logout clears after us
        let state = self.state.read().await;
        if state.is_logging_out() {
            tracing::info!("Logout started during refresh, discarding the new token");
            return Err(GatewayError::LoggedOut);
        }
        self.credentials.persist(&fresh).await?;
        drop(state);

        tracing::info!(
            "Access token refreshed ({})",
            Sanitizer::sanitize_token(fresh.token())
        );
        Ok(fresh)
    }

    /// Drops the credential and sends the visitor to the login page
    async fn expire_session(&self) {
        if let Err(e) = self.credentials.clear().await {
            tracing::warn!("Failed to clear credential: {}", e);
        }

        let current = self.navigator.current_path();
        if current.contains("/login") {
            return;
        }

        let locale = extract_locale(&current).unwrap_or(self.default_locale);
        let target = localized_url("/login", locale);
        tracing::info!("Session expired, redirecting to {}", target);
        self.navigator.redirect(&target);
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn timer_slot(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.logout_timer.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Leaves the refreshing state however the owning request ends
///
/// A `send` future dropped mid-refresh (timeout, `select!`, task abort)
/// releases the state from `Drop`.
struct RefreshGuard {
    state: Arc<RwLock<GatewayState>>,
    armed: bool,
}

impl RefreshGuard {
    fn new(state: Arc<RwLock<GatewayState>>) -> Self {
        Self { state, armed: true }
    }

    async fn finish(mut self) -> GatewayState {
        let mut state = self.state.write().await;
        *state = state.finish_refresh();
        let finished = *state;
        drop(state);
        self.armed = false;
        finished
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::debug!("Refresh abandoned by its caller");

        if let Ok(mut state) = self.state.try_write() {
            *state = state.finish_refresh();
            return;
        }
        let state = Arc::clone(&self.state);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let mut state = state.write().await;
                    *state = state.finish_refresh();
                });
            }
            Err(e) => tracing::warn!("Could not release refresh state: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStorage;
    use crate::routing::MockNavigator;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig {
            api_base_url: server.uri(),
            logout_grace_ms: 100,
            ..AppConfig::default()
        }
    }

    fn navigator_at(location: &'static str) -> MockNavigator {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_current_path()
            .returning(move || location.to_string());
        navigator
    }

    async fn gateway(server: &MockServer, navigator: MockNavigator) -> (Gateway, Arc<MemoryStorage>) {
        let local = Arc::new(MemoryStorage::new());
        let gateway = Gateway::new(&config_for(server), local.clone(), Arc::new(navigator)).unwrap();
        (gateway, local)
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("authorization", "Bearer stored"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": { "id": 1 } })))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, local) = gateway(&server, MockNavigator::new()).await;
        local.store("stored").await.unwrap();

        let response = gateway.send(RequestContext::get("/auth/me")).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_refreshes_once_and_replays() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, local) = gateway(&server, MockNavigator::new()).await;
        local.store("expired").await.unwrap();

        let users: Vec<serde_json::Value> = gateway
            .send_json(RequestContext::get("/users"))
            .await
            .unwrap();

        assert!(users.is_empty());
        assert_eq!(local.load().await.unwrap(), Some("new".to_string()));
        assert_eq!(gateway.credentials().cookie().value(), Some("new".to_string()));
        assert_eq!(gateway.state().await, GatewayState::Normal);
    }

    #[tokio::test]
    async fn test_second_401_after_refresh_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _local) = gateway(&server, MockNavigator::new()).await;

        let err = gateway.send(RequestContext::get("/users")).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(gateway.state().await, GatewayState::Normal);
    }

    #[tokio::test]
    async fn test_retried_request_does_not_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
            .expect(0)
            .mount(&server)
            .await;

        let (gateway, _local) = gateway(&server, MockNavigator::new()).await;
        let mut request = RequestContext::get("/users");
        request.mark_retried();

        let err = gateway.send(request).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_refresh_call_itself_is_not_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let (gateway, _local) = gateway(&server, MockNavigator::new()).await;

        let err = gateway.send(RequestContext::post("/auth/refresh")).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_validation_errors_pass_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "message": "Email already exists" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (gateway, _local) = gateway(&server, MockNavigator::new()).await;

        let err = gateway
            .send(RequestContext::post("/auth/register").json(&json!({})).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));
        assert_eq!(err.backend_message(), Some("Email already exists"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_and_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let mut navigator = navigator_at("/fa/admin/users");
        navigator
            .expect_redirect()
            .withf(|target| target.to_string() == "/fa/login")
            .times(1)
            .return_const(());

        let (gateway, local) = gateway(&server, navigator).await;
        local.store("stale").await.unwrap();

        let err = gateway.send(RequestContext::get("/users")).await.unwrap_err();

        assert!(matches!(err, GatewayError::RefreshFailed(_)));
        assert_eq!(local.load().await.unwrap(), None);
        assert_eq!(gateway.credentials().cookie().value(), None);
        assert_eq!(gateway.state().await, GatewayState::Normal);
    }

    #[tokio::test]
    async fn test_no_redirect_when_already_on_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut navigator = navigator_at("/en/login");
        navigator.expect_redirect().never();

        let (gateway, _local) = gateway(&server, navigator).await;
        let err = gateway.send(RequestContext::get("/auth/me")).await.unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_undecodable_refresh_body_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/plans"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "wrong-field" })))
            .mount(&server)
            .await;

        let mut navigator = navigator_at("/en/plans");
        navigator.expect_redirect().times(1).return_const(());

        let (gateway, _local) = gateway(&server, navigator).await;
        let err = gateway.send(RequestContext::get("/plans")).await.unwrap_err();

        match err {
            GatewayError::RefreshFailed(inner) => assert!(matches!(*inner, GatewayError::Decode(_))),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_logout_window_suppresses_refresh_and_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
            .expect(0)
            .mount(&server)
            .await;

        let mut navigator = MockNavigator::new();
        navigator.expect_redirect().never();

        let (gateway, local) = gateway(&server, navigator).await;
        local.store("valid").await.unwrap();

        gateway.logout().await.unwrap();
        assert!(gateway.state().await.is_logging_out());
        assert_eq!(local.load().await.unwrap(), None);

        let err = gateway.send(RequestContext::get("/users")).await.unwrap_err();
        assert!(err.is_unauthorized());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(gateway.state().await, GatewayState::Normal);
    }

    #[tokio::test]
    async fn test_newer_logout_extends_window() {
        let server = MockServer::start().await;
        let (gateway, _local) = gateway(&server, MockNavigator::new()).await;

        gateway.begin_logout().await;
        gateway.schedule_logout_end(Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(60)).await;
        gateway.schedule_logout_end(Duration::from_millis(200));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(gateway.state().await.is_logging_out());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(gateway.state().await, GatewayState::Normal);
    }

    #[tokio::test]
    async fn test_explicit_end_logout() {
        let server = MockServer::start().await;
        let (gateway, _local) = gateway(&server, MockNavigator::new()).await;

        gateway.begin_logout().await;
        gateway.schedule_logout_end(Duration::from_secs(60));
        gateway.end_logout().await;

        assert_eq!(gateway.state().await, GatewayState::Normal);
    }

    #[tokio::test]
    async fn test_cancelled_send_releases_refresh_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "accessToken": "new" }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let (gateway, local) = gateway(&server, MockNavigator::new()).await;
        local.store("expired").await.unwrap();

        let timed_out =
            tokio::time::timeout(Duration::from_millis(100), gateway.send(RequestContext::get("/users")))
                .await;
        assert!(timed_out.is_err());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(gateway.state().await, GatewayState::Normal);

        let response = gateway.send(RequestContext::get("/users")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(local.load().await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_refresh_finishing_after_logout_is_discarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "accessToken": "new" }))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut navigator = MockNavigator::new();
        navigator.expect_redirect().never();

        let config = AppConfig {
            api_base_url: server.uri(),
            logout_grace_ms: 1000,
            ..AppConfig::default()
        };
        let local = Arc::new(MemoryStorage::new());
        let gateway = Arc::new(Gateway::new(&config, local.clone(), Arc::new(navigator)).unwrap());
        local.store("expired").await.unwrap();

        let pending = {
            let gateway = gateway.clone();
            tokio::spawn(async move { gateway.send(RequestContext::get("/users")).await })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        gateway.logout().await.unwrap();

        let err = pending.await.unwrap().unwrap_err();
        match err {
            GatewayError::RefreshFailed(inner) => assert!(matches!(*inner, GatewayError::LoggedOut)),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(local.load().await.unwrap(), None);
        assert_eq!(gateway.credentials().cookie().value(), None);
        assert_eq!(
            gateway.state().await,
            GatewayState::LoggingOut { refreshing: false }
        );
    }

    #[test]
    fn test_url_for_joins_paths() {
        let config = AppConfig {
            api_base_url: "http://localhost:3001/api/".into(),
            ..AppConfig::default()
        };
        let gateway = Gateway::new(
            &config,
            Arc::new(MemoryStorage::new()),
            Arc::new(MockNavigator::new()),
        )
        .unwrap();

        assert_eq!(gateway.url_for("/users"), "http://localhost:3001/api/users");
        assert_eq!(gateway.url_for("plans"), "http://localhost:3001/api/plans");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = AppConfig {
            api_base_url: "not a url".into(),
            ..AppConfig::default()
        };
        let result = Gateway::new(
            &config,
            Arc::new(MemoryStorage::new()),
            Arc::new(MockNavigator::new()),
        );
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }
}
