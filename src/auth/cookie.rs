//! The `accessToken` cookie
//!
//! Mirrors the local token slot into the HTTP cookie jar so the backend can
//! read the credential from cookies as well as from the `Authorization`
//! header. The jar is the same one the gateway's `reqwest::Client` uses, so
//! cookies set by the backend (the refresh cookie) live next to it.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;

use super::secure_store::ACCESS_TOKEN_KEY;

/// Lifetime of the cookie in seconds (one day)
pub const COOKIE_MAX_AGE_SECS: u64 = 86_400;

const EXPIRED: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Writer for the credential cookie scoped to the API origin
#[derive(Clone)]
pub struct SessionCookie {
    jar: Arc<Jar>,
    url: Url,
}

impl SessionCookie {
    pub fn new(jar: Arc<Jar>, url: Url) -> Self {
        Self { jar, url }
    }

    /// The shared jar, for building a client with `cookie_provider`
    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// `Set-Cookie` form used when writing a token
    pub fn set_cookie_string(token: &str) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            ACCESS_TOKEN_KEY, token, COOKIE_MAX_AGE_SECS
        )
    }

    /// `Set-Cookie` form used when clearing the token
    pub fn clear_cookie_string() -> String {
        format!("{}=; Path=/; Expires={}", ACCESS_TOKEN_KEY, EXPIRED)
    }

    pub fn write(&self, token: &str) {
        self.jar
            .add_cookie_str(&Self::set_cookie_string(token), &self.url);
    }

    pub fn clear(&self) {
        self.jar.add_cookie_str(&Self::clear_cookie_string(), &self.url);
    }

    /// Current cookie value as the jar would send it
    pub fn value(&self) -> Option<String> {
        let header = self.jar.cookies(&self.url)?;
        let header = header.to_str().ok()?;
        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == ACCESS_TOKEN_KEY && !value.is_empty()).then(|| value.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie() -> SessionCookie {
        let url: Url = "http://localhost:3001".parse().unwrap();
        SessionCookie::new(Arc::new(Jar::default()), url)
    }

    #[test]
    fn test_set_cookie_attributes() {
        assert_eq!(
            SessionCookie::set_cookie_string("abc"),
            "accessToken=abc; Path=/; Max-Age=86400; SameSite=Lax"
        );
        assert_eq!(
            SessionCookie::clear_cookie_string(),
            "accessToken=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn test_write_and_read_back() {
        let cookie = cookie();
        assert_eq!(cookie.value(), None);

        cookie.write("token-1");
        assert_eq!(cookie.value(), Some("token-1".to_string()));

        cookie.write("token-2");
        assert_eq!(cookie.value(), Some("token-2".to_string()));
    }

    #[test]
    fn test_clear_removes_value() {
        let cookie = cookie();
        cookie.write("token-1");
        cookie.clear();
        assert_eq!(cookie.value(), None);
    }
}
