//! Install request parsing and validation

use secrecy::SecretString;
use serde::Deserialize;

use crate::errors::InstallerError;
use crate::http::client::ServiceTarget;
use crate::installer::profile::InstallProfile;
use crate::storage::install_record::InstallRecord;
use crate::storage::runtime_config::RuntimeConfig;
use crate::utils::is_present;

/// Raw `/install` body. Every field is optional until validated.
#[derive(Debug, Default, Deserialize)]
pub struct InstallRequest {
    #[serde(rename = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[serde(rename = "SUPABASE_ANON_KEY")]
    pub supabase_anon_key: Option<String>,

    #[serde(rename = "ZOOM_WEBHOOK_URL")]
    pub zoom_webhook_url: Option<String>,

    #[serde(rename = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    #[serde(rename = "ADMIN_PASSWORD")]
    pub admin_password: Option<String>,

    #[serde(rename = "SUPABASE_SERVICE_ROLE_KEY")]
    pub service_role_key: Option<String>,

    #[serde(rename = "SUPABASE_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    #[serde(rename = "SUPABASE_PROJECT_REF")]
    pub project_ref: Option<String>,

    #[serde(rename = "SUPABASE_DB_PASSWORD")]
    pub db_password: Option<String>,

    #[serde(rename = "ZOOM_WEBHOOK_SECRET")]
    pub zoom_webhook_secret: Option<String>,
}

impl InstallRequest {
    /// Parse a request body. An empty body, or JSON that is not an object,
    /// reads as an empty object.
    pub fn from_slice(body: &[u8]) -> Result<Self, InstallerError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        match serde_json::from_slice::<serde_json::Value>(body)? {
            value @ serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
            _ => Ok(Self::default()),
        }
    }

    /// Check the fields `profile` requires and split the request into the
    /// pieces each step consumes
    pub fn validate(self, profile: InstallProfile) -> Result<ValidatedInstall, InstallerError> {
        let mut required = vec![
            self.supabase_url.as_deref(),
            self.supabase_anon_key.as_deref(),
            self.admin_email.as_deref(),
            self.admin_password.as_deref(),
        ];
        if profile.provisions_admin() {
            required.push(self.service_role_key.as_deref());
        }
        if profile.manages_project() {
            required.push(self.access_token.as_deref());
            required.push(self.project_ref.as_deref());
        }
        if !required.into_iter().all(is_present) {
            return Err(InstallerError::MissingValues);
        }

        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        let supabase_url = self.supabase_url.unwrap_or_default();

        let service = if profile.provisions_admin() {
            non_empty(self.service_role_key).map(|key| ServiceTarget::new(supabase_url.clone(), key))
        } else {
            None
        };

        let project = match (non_empty(self.access_token), non_empty(self.project_ref)) {
            (Some(access_token), Some(project_ref)) if profile.manages_project() => {
                Some(ProjectLink {
                    access_token: SecretString::from(access_token),
                    project_ref,
                    db_password: non_empty(self.db_password).map(SecretString::from),
                    webhook_secret: non_empty(self.zoom_webhook_secret).map(SecretString::from),
                })
            }
            _ => None,
        };

        Ok(ValidatedInstall {
            config: RuntimeConfig {
                supabase_url,
                supabase_anon_key: self.supabase_anon_key.unwrap_or_default(),
                zoom_webhook_url: self.zoom_webhook_url.unwrap_or_default(),
            },
            admin: AdminCredentials {
                email: self.admin_email.unwrap_or_default(),
                password: SecretString::from(self.admin_password.unwrap_or_default()),
            },
            service,
            project,
        })
    }
}

#[derive(Debug)]
pub struct AdminCredentials {
    pub email: String,
    pub password: SecretString,
}

/// What the CLI needs to reach the remote project
#[derive(Debug)]
pub struct ProjectLink {
    pub access_token: SecretString,
    pub project_ref: String,
    pub db_password: Option<SecretString>,
    pub webhook_secret: Option<SecretString>,
}

/// A request that passed validation for its profile
#[derive(Debug)]
pub struct ValidatedInstall {
    pub config: RuntimeConfig,
    pub admin: AdminCredentials,
    /// Present for profiles that call the backend API
    pub service: Option<ServiceTarget>,
    /// Present for the project profile
    pub project: Option<ProjectLink>,
}

impl ValidatedInstall {
    pub fn install_record(&self) -> InstallRecord {
        use secrecy::ExposeSecret;

        InstallRecord {
            admin_email: self.admin.email.clone(),
            admin_password: self.admin.password.expose_secret().to_string(),
            access_token: self
                .project
                .as_ref()
                .map(|p| p.access_token.expose_secret().to_string()),
            project_ref: self.project.as_ref().map(|p| p.project_ref.clone()),
        }
    }
}
