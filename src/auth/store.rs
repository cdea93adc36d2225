//! Credential persistence across the local slot and the cookie

use std::sync::Arc;

use super::cookie::SessionCookie;
use super::credential::Credential;
use super::secure_store::{StorageError, TokenStorage};
use crate::security::Sanitizer;

/// Single owner of the persisted credential
///
/// Both backing writers are updated together: the local slot first, and
/// the cookie only once the local write went through.
pub struct CredentialStore {
    local: Arc<dyn TokenStorage>,
    cookie: SessionCookie,
}

impl CredentialStore {
    pub fn new(local: Arc<dyn TokenStorage>, cookie: SessionCookie) -> Self {
        Self { local, cookie }
    }

    pub fn cookie(&self) -> &SessionCookie {
        &self.cookie
    }

    /// Reads the credential from the local slot
    pub async fn current(&self) -> Result<Option<Credential>, StorageError> {
        Ok(self
            .local
            .load()
            .await?
            .filter(|t| !t.is_empty())
            .map(Credential::new))
    }

    pub async fn persist(&self, credential: &Credential) -> Result<(), StorageError> {
        self.local.store(credential.token()).await?;
        self.cookie.write(credential.token());
        tracing::debug!(
            "Persisted credential {} to {} and cookie",
            Sanitizer::sanitize_token(credential.token()),
            self.local.key()
        );
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.local.clear().await?;
        self.cookie.clear();
        tracing::debug!("Cleared credential from {} and cookie", self.local.key());
        Ok(())
    }
}
