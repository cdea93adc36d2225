//! Local key/value storage for the access token
//!
//! The token lives in one named slot, `accessToken`. A [`TokenStorage`]
//! backs it with process memory or with the OS credential manager (via the
//! keyring crate).

use std::sync::Arc;

use async_trait::async_trait;
use keyring::Entry;
use thiserror::Error;
use tokio::sync::RwLock;

/// Key under which the access token is stored
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Errors that can occur during token storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Storage task failed: {0}")]
    Task(String),
}

/// A single named slot holding a token
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Name of the slot (`accessToken`)
    fn key(&self) -> &str;

    async fn load(&self) -> Result<Option<String>, StorageError>;

    async fn store(&self, token: &str) -> Result<(), StorageError>;

    /// Returns `true` if a value was removed
    async fn clear(&self) -> Result<bool, StorageError>;
}

/// In-process token slot
#[derive(Debug)]
pub struct MemoryStorage {
    key: String,
    value: RwLock<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_key(ACCESS_TOKEN_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: RwLock::new(None),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStorage for MemoryStorage {
    fn key(&self) -> &str {
        &self.key
    }

    async fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.read().await.clone())
    }

    async fn store(&self, token: &str) -> Result<(), StorageError> {
        *self.value.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<bool, StorageError> {
        Ok(self.value.write().await.take().is_some())
    }
}

/// Token slot in the platform credential manager
///
/// Windows Credential Manager, macOS Keychain or Linux Secret Service,
/// whichever the keyring crate resolves for the current platform.
///
/// # Example
///
/// ```no_run
/// # async fn demo() -> Result<(), retrader_lib::auth::StorageError> {
/// use retrader_lib::auth::{KeyringStorage, TokenStorage};
///
/// let storage = KeyringStorage::new()?;
/// storage.store("eyJ...").await?;
/// assert_eq!(storage.load().await?, Some("eyJ...".to_string()));
/// storage.clear().await?;
/// # Ok(())
/// # }
/// ```
pub struct KeyringStorage {
    service: &'static str,
    key: &'static str,
    entry: Arc<Entry>,
}

impl KeyringStorage {
    /// Opens the default `Retrader` / `accessToken` slot
    pub fn new() -> Result<Self, StorageError> {
        Self::with_service("Retrader")
    }

    /// Opens a slot under a custom service name
    ///
    /// Useful for testing or keeping several backends apart.
    pub fn with_service(service: &'static str) -> Result<Self, StorageError> {
        let entry = Entry::new(service, ACCESS_TOKEN_KEY)?;
        Ok(Self {
            service,
            key: ACCESS_TOKEN_KEY,
            entry: Arc::new(entry),
        })
    }

    pub fn service(&self) -> &str {
        self.service
    }

    /// Runs a blocking keyring call off the async executor
    async fn blocking<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Entry) -> Result<T, StorageError> + Send + 'static,
    {
        let entry = Arc::clone(&self.entry);
        tokio::task::spawn_blocking(move || op(&entry))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

#[async_trait]
impl TokenStorage for KeyringStorage {
    fn key(&self) -> &str {
        self.key
    }

    async fn load(&self) -> Result<Option<String>, StorageError> {
        self.blocking(|entry| match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::Keyring(e)),
        })
        .await
    }

    async fn store(&self, token: &str) -> Result<(), StorageError> {
        let token = token.to_string();
        self.blocking(move |entry| entry.set_password(&token).map_err(StorageError::from))
            .await
    }

    async fn clear(&self) -> Result<bool, StorageError> {
        self.blocking(|entry| match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(StorageError::Keyring(e)),
        })
        .await
    }
}
