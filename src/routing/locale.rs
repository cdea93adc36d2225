//! Supported locales and locale-prefixed paths
//!
//! Every page lives under `/{locale}/...`; paths that already carry a
//! supported prefix are left alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fa,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Fa];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fa => "fa",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Persian is laid out right-to-left
    pub fn is_rtl(&self) -> bool {
        matches!(self, Locale::Fa)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.to_ascii_lowercase()).ok_or_else(|| format!("unsupported locale: {}", s))
    }
}

fn has_locale_prefix(clean: &str) -> bool {
    Locale::ALL
        .iter()
        .any(|l| clean.strip_prefix(l.code()).is_some_and(|rest| rest.starts_with('/')))
}

/// `/login` → `/{locale}/login`, `/fa/home` stays `/fa/home`
pub fn localized_url(path: &str, locale: Locale) -> String {
    format!("/{}", localized_path(path, locale))
}

/// Same as [`localized_url`] without the leading slash
pub fn localized_path(path: &str, locale: Locale) -> String {
    let clean = path.strip_prefix('/').unwrap_or(path);
    if has_locale_prefix(clean) {
        clean.to_string()
    } else {
        format!("{}/{}", locale.code(), clean)
    }
}

/// Reads the leading locale segment of a path
///
/// Unsupported or missing segments resolve to `None`.
pub fn extract_locale(pathname: &str) -> Option<Locale> {
    let rest = pathname.strip_prefix('/')?;
    let segment = rest.split('/').next()?;
    if segment.len() == 2 && segment.bytes().all(|b| b.is_ascii_lowercase()) {
        Locale::from_code(segment)
    } else {
        None
    }
}

pub fn is_localized_path(pathname: &str) -> bool {
    pathname
        .strip_prefix('/')
        .is_some_and(has_locale_prefix)
}
