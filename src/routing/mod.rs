//! Routing module - Locales, navigation and the route guard

mod guard;
mod locale;
mod navigator;

pub use guard::{landing_path, resolve_route, RouteDecision, SessionInfo};
pub use locale::{extract_locale, is_localized_path, localized_path, localized_url, Locale};
pub use navigator::{HistoryNavigator, Navigator};

#[cfg(test)]
pub(crate) use navigator::MockNavigator;
