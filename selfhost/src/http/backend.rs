//! Provisioning operations the installer needs from the backend

use async_trait::async_trait;
use secrecy::SecretString;

use crate::errors::ProvisionError;
use crate::http::buckets::UPLOADS_BUCKET;
use crate::http::client::{HttpBackend, ServiceTarget};
use crate::models::settings::SettingRow;
use crate::models::user::AuthUser;

/// Backend-as-a-service operations used while installing.
///
/// Each call is independent and safe to repeat. Failures come back as a
/// typed [`ProvisionError`]; nothing is retried.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Create a confirmed admin account
    async fn create_admin(
        &self,
        target: &ServiceTarget,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthUser, ProvisionError>;

    /// Up to 200 existing accounts
    async fn list_users(&self, target: &ServiceTarget) -> Result<Vec<AuthUser>, ProvisionError>;

    /// Re-apply confirmation and admin metadata
    async fn update_user(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError>;

    async fn upsert_profile(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError>;

    async fn upsert_admin_role(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError>;

    async fn upsert_setting(&self, target: &ServiceTarget, row: &SettingRow) -> Result<(), ProvisionError>;

    /// Create the public uploads bucket; an existing bucket is success
    async fn create_uploads_bucket(&self, target: &ServiceTarget) -> Result<(), ProvisionError>;
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn create_admin(
        &self,
        target: &ServiceTarget,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthUser, ProvisionError> {
        self.create_admin_user(target, email, password).await
    }

    async fn list_users(&self, target: &ServiceTarget) -> Result<Vec<AuthUser>, ProvisionError> {
        self.list_auth_users(target).await
    }

    async fn update_user(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        self.update_auth_user(target, user_id).await
    }

    async fn upsert_profile(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        self.upsert_admin_profile(target, user_id).await
    }

    async fn upsert_admin_role(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        self.upsert_user_role(target, user_id).await
    }

    async fn upsert_setting(&self, target: &ServiceTarget, row: &SettingRow) -> Result<(), ProvisionError> {
        self.upsert_setting_row(target, row).await
    }

    async fn create_uploads_bucket(&self, target: &ServiceTarget) -> Result<(), ProvisionError> {
        self.create_public_bucket(target, UPLOADS_BUCKET).await
    }
}
