//! Storage bucket API

use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use crate::errors::ProvisionError;
use crate::http::client::{is_conflict, rejection, HttpBackend, ServiceTarget};

/// Public bucket the frontend uploads into
pub const UPLOADS_BUCKET: &str = "uploads";

#[derive(Debug, Serialize)]
struct CreateBucketRequest<'a> {
    id: &'a str,
    name: &'a str,
    public: bool,
}

impl HttpBackend {
    /// Create a public bucket. An existing bucket counts as success.
    pub async fn create_public_bucket(&self, target: &ServiceTarget, name: &str) -> Result<(), ProvisionError> {
        let body = CreateBucketRequest {
            id: name,
            name,
            public: true,
        };
        let request = self.request(Method::POST, target, "/storage/v1/bucket")?.json(&body);
        let response = self.execute(request).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if is_conflict(status) {
            debug!("Bucket {} already exists", name);
            return Ok(());
        }
        Err(rejection(response).await)
    }
}
