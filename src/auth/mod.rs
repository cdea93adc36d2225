//! Authentication module - Credential model and persistence
//!
//! The access token lives in two places that are always written together:
//! - a local key/value slot (memory or the OS credential manager)
//! - the `accessToken` cookie in the HTTP cookie jar

mod cookie;
mod credential;
mod secure_store;
mod store;

pub use cookie::{SessionCookie, COOKIE_MAX_AGE_SECS};
pub use credential::{Credential, Role, TokenClaims};
pub use secure_store::{KeyringStorage, MemoryStorage, StorageError, TokenStorage, ACCESS_TOKEN_KEY};
pub use store::CredentialStore;

#[cfg(test)]
pub(crate) use credential::jwt_with_payload;
