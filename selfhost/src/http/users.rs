//! Admin user API

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};

use crate::errors::ProvisionError;
use crate::http::client::{HttpBackend, ServiceTarget};
use crate::models::user::{AdminMetadata, AuthUser, CreateUserRequest, UpdateUserRequest, UserList};

const ADMIN_USERS_PATH: &str = "/auth/v1/admin/users";

/// Page size when scanning for an existing account
pub const LIST_USERS_PAGE_SIZE: u32 = 200;

impl HttpBackend {
    /// Create a confirmed user carrying admin role metadata
    pub async fn create_admin_user(
        &self,
        target: &ServiceTarget,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthUser, ProvisionError> {
        let body = CreateUserRequest {
            email,
            password: password.expose_secret(),
            email_confirm: true,
            user_metadata: AdminMetadata::default(),
        };
        let request = self.request(Method::POST, target, ADMIN_USERS_PATH)?.json(&body);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// First page of users
    pub async fn list_auth_users(&self, target: &ServiceTarget) -> Result<Vec<AuthUser>, ProvisionError> {
        let path = format!("{}?per_page={}", ADMIN_USERS_PATH, LIST_USERS_PAGE_SIZE);
        let request = self.request(Method::GET, target, &path)?;
        let response = self.send(request).await?;
        let list: UserList = response.json().await?;
        Ok(list.into_users())
    }

    /// Re-apply confirmation and admin metadata to an existing user
    pub async fn update_auth_user(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        let path = format!("{}/{}", ADMIN_USERS_PATH, user_id);
        let request = self
            .request(Method::PUT, target, &path)?
            .json(&UpdateUserRequest::default());
        self.send(request).await?;
        Ok(())
    }
}
