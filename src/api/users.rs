//! Admin user listing

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{fail, ApiError};
use crate::auth::Role;
use crate::gateway::{Gateway, RequestContext};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: u64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: Role,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    /// Case-insensitive match on email, username and names
    pub fn matches_search(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        [
            Some(self.email.as_str()),
            Some(self.username.as_str()),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Role tab on the users page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    User,
    Admin,
}

impl RoleFilter {
    pub fn accepts(&self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::User => role == Role::User,
            RoleFilter::Admin => role == Role::Admin,
        }
    }
}

impl FromStr for RoleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(RoleFilter::All),
            "USER" => Ok(RoleFilter::User),
            "ADMIN" => Ok(RoleFilter::Admin),
            other => Err(format!("unknown role filter: {}", other)),
        }
    }
}

/// Users matching both the search text and the role filter
pub fn filter_users<'a>(users: &'a [AdminUser], search: &str, role: RoleFilter) -> Vec<&'a AdminUser> {
    users
        .iter()
        .filter(|u| u.matches_search(search) && role.accepts(u.role))
        .collect()
}

#[derive(Clone)]
pub struct UsersApi {
    gateway: Arc<Gateway>,
}

impl UsersApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// All accounts; admin only
    pub async fn list_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.gateway
            .send_json(RequestContext::get("/users"))
            .await
            .map_err(fail("Failed to fetch users"))
    }
}
