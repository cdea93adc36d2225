//! End-to-end gateway behaviour against a mock backend

use std::sync::Arc;
use std::time::Duration;

use retrader_lib::auth::{MemoryStorage, TokenStorage};
use retrader_lib::config::AppConfig;
use retrader_lib::gateway::{Gateway, GatewayError, GatewayState, RequestContext};
use retrader_lib::routing::{HistoryNavigator, Navigator};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    server: MockServer,
    gateway: Arc<Gateway>,
    local: Arc<MemoryStorage>,
    navigator: Arc<HistoryNavigator>,
}

async fn harness(start_at: &str) -> Harness {
    let server = MockServer::start().await;
    let config = AppConfig {
        api_base_url: server.uri(),
        ..AppConfig::default()
    };
    let local = Arc::new(MemoryStorage::new());
    let navigator = Arc::new(HistoryNavigator::new(start_at));
    let gateway = Gateway::new(&config, local.clone(), navigator.clone()).unwrap();

    Harness {
        server,
        gateway: Arc::new(gateway),
        local,
        navigator,
    }
}

async fn mount_users_requiring(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_anonymous_request_redirects_to_login_when_refresh_fails() {
    let h = harness("/en/admin/users").await;
    mount_users_requiring(&h.server, "never-issued").await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = assert_err!(h.gateway.send(RequestContext::get("/users")).await);
    assert!(matches!(err, GatewayError::RefreshFailed(_)));

    let requests = h.server.received_requests().await.unwrap();
    let users_call = requests
        .iter()
        .find(|r| r.url.path() == "/users")
        .unwrap();
    assert!(users_call.headers.get("authorization").is_none());

    assert_eq!(h.local.load().await.unwrap(), None);
    assert_eq!(h.gateway.credentials().cookie().value(), None);
    assert_eq!(h.navigator.current_path(), "/en/login");
}

#[tokio::test]
async fn test_expired_credential_is_refreshed_and_request_replayed() {
    let h = harness("/en/admin/users").await;
    mount_users_requiring(&h.server, "new").await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
        .expect(1)
        .mount(&h.server)
        .await;

    h.local.store("expired").await.unwrap();

    let response = assert_ok!(h.gateway.send(RequestContext::get("/users")).await);
    assert_eq!(response.status(), 200);

    assert_eq!(h.local.load().await.unwrap(), Some("new".to_string()));
    assert_eq!(h.gateway.credentials().cookie().value(), Some("new".to_string()));
    assert_eq!(h.navigator.history(), vec!["/en/admin/users"]);

    let users_calls = h
        .server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/users")
        .count();
    assert_eq!(users_calls, 2);
}

#[tokio::test]
async fn test_logout_window_swallows_401_then_closes() {
    let h = harness("/fa/plans").await;
    mount_users_requiring(&h.server, "valid").await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
        .expect(0)
        .mount(&h.server)
        .await;

    h.local.store("valid").await.unwrap();

    assert_ok!(h.gateway.logout().await);
    assert!(h.gateway.state().await.is_logging_out());

    let err = assert_err!(h.gateway.send(RequestContext::get("/users")).await);
    assert!(err.is_unauthorized());
    assert_eq!(h.navigator.history(), vec!["/fa/plans"]);

    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert_eq!(h.gateway.state().await, GatewayState::Normal);
}

#[tokio::test]
async fn test_request_in_flight_at_logout_fails_quietly() {
    let h = harness("/en/plans").await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "Unauthorized" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "new" })))
        .expect(0)
        .mount(&h.server)
        .await;

    h.local.store("valid").await.unwrap();

    let pending = {
        let gateway = h.gateway.clone();
        tokio::spawn(async move { gateway.send(RequestContext::get("/users")).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_ok!(h.gateway.logout().await);

    let err = assert_err!(pending.await.unwrap());
    assert!(err.is_unauthorized());
    assert!(h.gateway.state().await.is_logging_out());
    assert_eq!(h.navigator.history(), vec!["/en/plans"]);
    assert_eq!(h.local.load().await.unwrap(), None);
}

#[tokio::test]
async fn test_concurrent_401_during_refresh_does_not_refresh_again() {
    let h = harness("/en/home").await;
    mount_users_requiring(&h.server, "new").await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accessToken": "new" }))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    h.local.store("expired").await.unwrap();

    let first = {
        let gateway = h.gateway.clone();
        tokio::spawn(async move { gateway.send(RequestContext::get("/users")).await })
    };

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(h.gateway.state().await, GatewayState::Refreshing);

    let second = assert_err!(h.gateway.send(RequestContext::get("/users")).await);
    assert!(second.is_unauthorized());

    let first = first.await.unwrap();
    assert_ok!(first);
    assert_eq!(h.gateway.state().await, GatewayState::Normal);
}

#[tokio::test]
async fn test_backend_validation_error_is_not_retried() {
    let h = harness("/en/signup").await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "Email already exists" })))
        .expect(1)
        .mount(&h.server)
        .await;

    let request = RequestContext::post("/auth/register")
        .json(&json!({ "email": "taken@retrader.io", "password": "secret1", "username": "taken" }))
        .unwrap();
    let err = assert_err!(h.gateway.send(request).await);

    assert_eq!(err.backend_message(), Some("Email already exists"));
    assert_eq!(err.to_string(), "HTTP 409 Conflict: Email already exists");
}
