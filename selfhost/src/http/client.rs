//! HTTP client for the backend API
//!
//! Unlike the CLI steps, which run without a limit, every backend call is
//! bounded by a client timeout. A backend that never answers fails the call
//! as unreachable instead of holding the install open.

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use url::Url;

use crate::errors::{InstallerError, ProvisionError};

/// Default timeout for a single backend call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend project a call is addressed to, with the secret that authorizes it
#[derive(Debug)]
pub struct ServiceTarget {
    pub url: String,
    pub service_role_key: SecretString,
}

impl ServiceTarget {
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_role_key: SecretString::from(service_role_key.into()),
        }
    }

    /// Resolve `path` against the project URL. Absolute paths replace any
    /// path on the base, as a browser would.
    pub fn endpoint(&self, path: &str) -> Result<Url, ProvisionError> {
        Ok(Url::parse(&self.url)?.join(path)?)
    }
}

/// HTTP client for the backend admin, data and storage APIs
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
}

impl HttpBackend {
    pub fn new() -> Result<Self, InstallerError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, InstallerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Start a request carrying the service-role secret as both api key and bearer token
    pub(crate) fn request(
        &self,
        method: reqwest::Method,
        target: &ServiceTarget,
        path: &str,
    ) -> Result<RequestBuilder, ProvisionError> {
        let url = target.endpoint(path)?;
        debug!("{} {}", method, url);

        let key = target.service_role_key.expose_secret();
        Ok(self
            .client
            .request(method, url)
            .header("apikey", key)
            .header(header::AUTHORIZATION, format!("Bearer {}", key)))
    }

    /// Send without judging the status
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<Response, ProvisionError> {
        Ok(request.send().await?)
    }

    /// Send and require a 2xx status
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ProvisionError> {
        let response = self.execute(request).await?;
        ensure_success(response).await
    }
}

/// Turn a non-2xx response into [`ProvisionError::Rejected`]
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ProvisionError> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(rejection(response).await)
}

pub(crate) async fn rejection(response: Response) -> ProvisionError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!("Backend rejected request: {} - {}", status, body);
    ProvisionError::Rejected {
        status: status.as_u16(),
        body,
    }
}

pub(crate) fn is_conflict(status: StatusCode) -> bool {
    status == StatusCode::CONFLICT
}
