//! Navigation seam used for auth redirects

use std::sync::Mutex;

use super::locale::{extract_locale, localized_url, Locale};

/// Path-based navigation provider
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Current location path, e.g. `/fa/admin/users`
    fn current_path(&self) -> String;

    /// Hard redirect to an absolute path
    fn redirect(&self, path: &str);
}

/// In-memory navigator that keeps a history stack
///
/// `push`/`replace` localize the target with the locale of the current
/// location; `redirect` records the target verbatim.
#[derive(Debug)]
pub struct HistoryNavigator {
    default_locale: Locale,
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_default_locale(initial, Locale::default())
    }

    pub fn with_default_locale(initial: impl Into<String>, default_locale: Locale) -> Self {
        Self {
            default_locale,
            history: Mutex::new(vec![initial.into()]),
        }
    }

    /// Locale of the current location, or the default one
    pub fn locale(&self) -> Locale {
        extract_locale(&self.current_path()).unwrap_or(self.default_locale)
    }

    pub fn push(&self, path: &str) {
        let target = localized_url(path, self.locale());
        self.entries().push(target);
    }

    pub fn replace(&self, path: &str) {
        let target = localized_url(path, self.locale());
        let mut history = self.entries();
        history.pop();
        history.push(target);
    }

    /// Steps back one entry; the first entry is never popped
    pub fn back(&self) -> bool {
        let mut history = self.entries();
        if history.len() > 1 {
            history.pop();
            true
        } else {
            false
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.entries().clone()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> String {
        self.entries().last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn redirect(&self, path: &str) {
        tracing::debug!("Navigating to {}", path);
        self.entries().push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_localizes_with_current_locale() {
        let nav = HistoryNavigator::new("/fa/home");
        nav.push("/plans");
        assert_eq!(nav.current_path(), "/fa/plans");
        assert_eq!(nav.locale(), Locale::Fa);
    }

    #[test]
    fn test_push_falls_back_to_default_locale() {
        let nav = HistoryNavigator::with_default_locale("/", Locale::Fa);
        nav.push("login");
        assert_eq!(nav.current_path(), "/fa/login");
    }

    #[test]
    fn test_replace_and_back() {
        let nav = HistoryNavigator::new("/en/home");
        nav.push("/plans");
        nav.replace("/success");
        assert_eq!(nav.history(), vec!["/en/home", "/en/success"]);

        assert!(nav.back());
        assert_eq!(nav.current_path(), "/en/home");
        assert!(!nav.back());
    }

    #[test]
    fn test_redirect_is_verbatim() {
        let nav = HistoryNavigator::default();
        nav.redirect("https://checkout.stripe.com/c/pay/cs_test");
        assert_eq!(nav.current_path(), "https://checkout.stripe.com/c/pay/cs_test");
    }
}
