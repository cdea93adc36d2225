//! Route guard for locale prefixes and authentication
//!
//! Decides, for an incoming path and the current session, whether the page
//! may render or where the visitor should be sent instead.

use super::locale::{extract_locale, localized_url, Locale};
use crate::auth::Role;

const PROTECTED_PATHS: &[&str] = &["/home", "/dashboard", "/admin", "/plans"];
const AUTH_PATHS: &[&str] = &["/login", "/register", "/signup"];
const BARE_ROUTES: &[&str] = &["/login", "/register", "/signup", "/home", "/dashboard"];

/// What the route guard knows about the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionInfo {
    pub authenticated: bool,
    pub role: Option<Role>,
}

impl SessionInfo {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(role: Role) -> Self {
        Self {
            authenticated: true,
            role: Some(role),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(|r| r.is_admin())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Continue,
    Redirect(String),
}

/// Unlocalized landing page for a role
pub fn landing_path(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => "/admin/dashboard",
        _ => "/home",
    }
}

pub fn resolve_route(pathname: &str, session: &SessionInfo) -> RouteDecision {
    if pathname == "/" {
        let target = if session.authenticated {
            landing_path(session.role)
        } else {
            "/login"
        };
        return RouteDecision::Redirect(localized_url(target, Locale::En));
    }

    if BARE_ROUTES.contains(&pathname) {
        return RouteDecision::Redirect(localized_url(pathname, Locale::En));
    }

    let locale = extract_locale(pathname).unwrap_or_default();
    let is_protected = PROTECTED_PATHS.iter().any(|p| pathname.contains(p));
    let is_auth_page = AUTH_PATHS.iter().any(|p| pathname.contains(p));

    if is_protected && !session.authenticated {
        return RouteDecision::Redirect(localized_url("/login", locale));
    }

    if pathname.contains("/admin") && !session.is_admin() {
        return RouteDecision::Redirect(localized_url("/home", locale));
    }

    if is_auth_page && session.authenticated {
        return RouteDecision::Redirect(localized_url(landing_path(session.role), locale));
    }

    RouteDecision::Continue
}
