//! Retrader - Authenticated client for the Retrader trading platform
//!
//! Talks to the Retrader backend on behalf of a signed-in user: plans and
//! checkout, account flows, and the admin user list.
//!
//! ## Features
//!
//! - Bearer-token requests with transparent token refresh on 401
//! - At most one refresh in flight, and none while logging out
//! - Credential persistence in the OS credential manager plus a session cookie
//! - Locale-aware routing (English and Persian) with an auth route guard
//! - Bilingual form validation
//!
//! ## Architecture
//!
//! - **Gateway**: authenticated HTTP access with the refresh/logout state machine
//! - **Auth**: credential model, local storage and the `accessToken` cookie
//! - **Api**: typed backend endpoints on top of the gateway
//! - **Session**: signed-in user, login flows and logout
//! - **Routing**: locales, navigation and the route guard
//! - **Security**: sanitization and zeroizing strings

pub mod api;
pub mod auth;
pub mod config;
pub mod gateway;
pub mod routing;
pub mod security;
pub mod session;
pub mod validation;

use std::sync::Arc;

use api::{PlansApi, UsersApi};
use auth::TokenStorage;
use config::AppConfig;
use gateway::{Gateway, GatewayError};
use routing::{resolve_route, Navigator, RouteDecision};
use session::SessionManager;

/// Everything a front end needs, wired to one gateway
pub struct AppState {
    pub config: AppConfig,
    pub gateway: Arc<Gateway>,
    pub session: SessionManager,
    pub plans: PlansApi,
    pub users: UsersApi,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        local: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, GatewayError> {
        let gateway = Arc::new(Gateway::new(&config, local, navigator)?);

        Ok(Self {
            session: SessionManager::new(gateway.clone()),
            plans: PlansApi::new(gateway.clone()),
            users: UsersApi::new(gateway.clone()),
            gateway,
            config,
        })
    }

    /// Runs the route guard for `pathname` against the current session
    pub async fn guard(&self, pathname: &str) -> RouteDecision {
        let decision = resolve_route(pathname, &self.session.snapshot().await);
        if let RouteDecision::Redirect(target) = &decision {
            tracing::debug!("Route {} redirected to {}", pathname, target);
        }
        decision
    }
}

/// Installs the global `tracing` subscriber
///
/// Starts from `RUST_LOG` and adds debug logging for this crate plus info
/// for everything else. Calling it twice is harmless.
pub fn init_tracing() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["retrader_lib=debug", "retrader=debug", "info"] {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring log directive {}: {}", directive, e),
        }
    }

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok() {
        tracing::info!("Starting Retrader...");
    }
}
