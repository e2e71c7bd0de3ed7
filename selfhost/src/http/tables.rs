//! Data table API

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::errors::ProvisionError;
use crate::http::client::{HttpBackend, ServiceTarget};
use crate::models::settings::SettingRow;

/// Ask the data API to merge on primary-key conflict instead of failing
const PREFER_MERGE: &str = "resolution=merge-duplicates";

impl HttpBackend {
    /// Insert or merge one row into `table`
    pub async fn upsert_row<B: Serialize + ?Sized>(
        &self,
        target: &ServiceTarget,
        table: &str,
        on_conflict: Option<&str>,
        row: &B,
    ) -> Result<(), ProvisionError> {
        let path = match on_conflict {
            Some(column) => format!("/rest/v1/{}?on_conflict={}", table, column),
            None => format!("/rest/v1/{}", table),
        };
        let request = self
            .request(Method::POST, target, &path)?
            .header("Prefer", PREFER_MERGE)
            .json(row);
        self.send(request).await?;
        Ok(())
    }

    pub async fn upsert_admin_profile(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        self.upsert_row(target, "profiles", None, &json!({ "id": user_id, "role": "admin" }))
            .await
    }

    pub async fn upsert_user_role(&self, target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        self.upsert_row(target, "user_roles", None, &json!({ "user_id": user_id, "role": "admin" }))
            .await
    }

    pub async fn upsert_setting_row(&self, target: &ServiceTarget, row: &SettingRow) -> Result<(), ProvisionError> {
        self.upsert_row(target, "settings", Some("key"), row).await
    }
}
