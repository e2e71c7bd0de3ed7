//! Auth user models

use serde::{Deserialize, Serialize};

/// Role metadata stamped on the admin account. The role is spelled three
/// ways because downstream policies check different keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMetadata {
    pub role: String,
    pub is_admin: bool,
    #[serde(rename = "ROLE")]
    pub role_upper: String,
}

impl Default for AdminMetadata {
    fn default() -> Self {
        Self {
            role: "admin".to_string(),
            is_admin: true,
            role_upper: "ADMIN".to_string(),
        }
    }
}

/// Body for creating a pre-confirmed admin user
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub email_confirm: bool,
    pub user_metadata: AdminMetadata,
}

/// Body for re-applying confirmation and role metadata
#[derive(Debug, Clone, Serialize)]
pub struct UpdateUserRequest {
    pub email_confirm: bool,
    pub user_metadata: AdminMetadata,
}

impl Default for UpdateUserRequest {
    fn default() -> Self {
        Self {
            email_confirm: true,
            user_metadata: AdminMetadata::default(),
        }
    }
}

/// A user as returned by the admin API. Only the fields we act on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    /// Case-insensitive email match
    pub fn has_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == email.to_lowercase())
    }
}

/// The list endpoint has answered both as a bare array and wrapped in
/// `{"users": [...]}` depending on the server version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum UserList {
    Bare(Vec<AuthUser>),
    Wrapped { users: Vec<AuthUser> },
}

impl UserList {
    pub fn into_users(self) -> Vec<AuthUser> {
        match self {
            UserList::Bare(users) | UserList::Wrapped { users } => users,
        }
    }
}

/// Find the id of the user owning `email`
pub fn find_user_id(users: &[AuthUser], email: &str) -> Option<String> {
    users
        .iter()
        .filter(|u| u.id.as_deref().is_some_and(|id| !id.is_empty()))
        .find(|u| u.has_email(email))
        .and_then(|u| u.id.clone())
}
