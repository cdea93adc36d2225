//! Configuration management for Retrader
//!
//! Holds the backend location, the default locale, the gateway timings and
//! the admin site settings. The file lives in the per-user config directory
//! on Windows, macOS and Linux; `RETRADER_API_URL` and `RETRADER_LOCALE`
//! override the stored values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routing::Locale;

pub const API_URL_ENV: &str = "RETRADER_API_URL";
pub const LOCALE_ENV: &str = "RETRADER_LOCALE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config path")]
    NoConfigDir,

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported locale: {0}")]
    InvalidLocale(String),
}

/// Site-wide settings edited from the admin settings page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    pub site_description: String,
    pub max_users: u32,
    pub maintenance_mode: bool,
    pub email_notifications: bool,
    pub auto_backup: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Retrader".to_string(),
            site_description: "Advanced Trading Platform".to_string(),
            max_users: 10_000,
            maintenance_mode: false,
            email_notifications: true,
            auto_backup: true,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend base URL, e.g. `http://localhost:3001`
    pub api_base_url: String,
    /// Locale used when the current location carries none
    #[serde(default)]
    pub default_locale: Locale,
    /// How long the gateway stays in the logout window, in milliseconds
    #[serde(default = "default_logout_grace_ms")]
    pub logout_grace_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub site: SiteSettings,
}

fn default_logout_grace_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001".to_string(),
            default_locale: Locale::default(),
            logout_grace_ms: default_logout_grace_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            site: SiteSettings::default(),
        }
    }
}

impl AppConfig {
    /// Gets the config directory path (cross-platform)
    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA")
                .ok()
                .map(|p| PathBuf::from(p).join("Retrader"))
        }

        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|p| PathBuf::from(p).join("Library/Application Support/Retrader"))
        }

        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| std::env::var("HOME").ok().map(|p| PathBuf::from(p).join(".config")))
                .map(|p| p.join("retrader"))
        }

        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Loads configuration from disk, then applies environment overrides
    ///
    /// A missing or unreadable file yields the defaults.
    pub fn load() -> Self {
        let stored = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        };
        stored.with_env_overrides()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Saves configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Applies `RETRADER_API_URL` and `RETRADER_LOCALE`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(LOCALE_ENV).ok(),
        )
    }

    fn with_overrides(mut self, api_url: Option<String>, locale: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(code) = locale {
            match self.set_locale(&code) {
                Ok(()) => {}
                Err(e) => tracing::warn!("{}", e),
            }
        }
        self
    }

    pub fn set_locale(&mut self, code: &str) -> Result<(), ConfigError> {
        self.default_locale = Locale::from_code(code.trim())
            .ok_or_else(|| ConfigError::InvalidLocale(code.to_string()))?;
        Ok(())
    }

    pub fn logout_grace(&self) -> Duration {
        Duration::from_millis(self.logout_grace_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
