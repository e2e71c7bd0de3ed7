//! Shared fakes and fixtures

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use tempfile::TempDir;

use selfhost_installer::deploy::command::CliCommand;
use selfhost_installer::deploy::runner::{CommandOutcome, CommandRunner};
use selfhost_installer::errors::ProvisionError;
use selfhost_installer::http::backend::BackendApi;
use selfhost_installer::http::client::ServiceTarget;
use selfhost_installer::installer::install::{Installer, InstallerOptions};
use selfhost_installer::installer::profile::InstallProfile;
use selfhost_installer::installer::request::InstallRequest;
use selfhost_installer::models::settings::SettingRow;
use selfhost_installer::models::user::AuthUser;
use selfhost_installer::storage::layout::StorageLayout;
use selfhost_installer::storage::runtime_config::ConfigStore;

/// In-memory backend that records every call by name
#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    /// Id returned by create_admin; `None` makes creation fail
    pub created_id: Option<String>,
    pub existing_users: Vec<AuthUser>,
    pub fail_bucket: bool,
    pub fail_settings: bool,
    pub fail_update: bool,
}

impl FakeBackend {
    pub fn creating(id: &str) -> Self {
        Self {
            created_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_existing(users: &[(&str, &str)]) -> Self {
        Self {
            existing_users: users
                .iter()
                .map(|(id, email)| AuthUser {
                    id: Some(id.to_string()),
                    email: Some(email.to_string()),
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing_bucket(mut self) -> Self {
        self.fail_bucket = true;
        self
    }

    pub fn failing_settings(mut self) -> Self {
        self.fail_settings = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn rejected() -> ProvisionError {
        ProvisionError::Rejected {
            status: 500,
            body: "boom".to_string(),
        }
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn create_admin(
        &self,
        _target: &ServiceTarget,
        email: &str,
        _password: &SecretString,
    ) -> Result<AuthUser, ProvisionError> {
        self.record(format!("create_admin:{}", email));
        match &self.created_id {
            Some(id) => Ok(AuthUser {
                id: Some(id.clone()),
                email: Some(email.to_string()),
            }),
            None => Err(ProvisionError::Rejected {
                status: 422,
                body: "email_exists".to_string(),
            }),
        }
    }

    async fn list_users(&self, _target: &ServiceTarget) -> Result<Vec<AuthUser>, ProvisionError> {
        self.record("list_users".to_string());
        Ok(self.existing_users.clone())
    }

    async fn update_user(&self, _target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        self.record(format!("update_user:{}", user_id));
        if self.fail_update {
            return Err(Self::rejected());
        }
        Ok(())
    }

    async fn upsert_profile(&self, _target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        self.record(format!("upsert_profile:{}", user_id));
        Ok(())
    }

    async fn upsert_admin_role(&self, _target: &ServiceTarget, user_id: &str) -> Result<(), ProvisionError> {
        self.record(format!("upsert_admin_role:{}", user_id));
        Ok(())
    }

    async fn upsert_setting(&self, _target: &ServiceTarget, row: &SettingRow) -> Result<(), ProvisionError> {
        self.record(format!("upsert_setting:{}", row.key));
        if self.fail_settings {
            return Err(Self::rejected());
        }
        Ok(())
    }

    async fn create_uploads_bucket(&self, _target: &ServiceTarget) -> Result<(), ProvisionError> {
        self.record("create_uploads_bucket".to_string());
        if self.fail_bucket {
            return Err(ProvisionError::Unreachable("connection refused".to_string()));
        }
        Ok(())
    }
}

/// A command the fake runner was asked to run
#[derive(Debug, Clone)]
pub struct RunCall {
    pub args: Vec<String>,
    pub workdir: PathBuf,
    pub env: HashMap<String, String>,
}

/// Runner that succeeds unless the command's first argument is listed in `fail_on`
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<RunCall>>,
    pub fail_on: Vec<String>,
    /// Subcommands that take `delay` to finish
    pub slow_on: Vec<String>,
    pub delay: Duration,
}

impl FakeRunner {
    pub fn failing_on(subcommands: &[&str]) -> Self {
        Self {
            fail_on: subcommands.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn slow_on(subcommands: &[&str], delay: Duration) -> Self {
        Self {
            slow_on: subcommands.iter().map(|s| s.to_string()).collect(),
            delay,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<RunCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Leading subcommand of each call, e.g. `secrets` or `db`
    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| c.args.first().cloned().unwrap_or_default())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(
        &self,
        command: &CliCommand,
        workdir: &Path,
        env: &HashMap<String, String>,
    ) -> CommandOutcome {
        self.calls.lock().unwrap().push(RunCall {
            args: command.args.clone(),
            workdir: workdir.to_path_buf(),
            env: env.clone(),
        });

        let subcommand = command.args.first().map(String::as_str).unwrap_or_default();
        if self.slow_on.iter().any(|s| s == subcommand) {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_on.iter().any(|f| f == subcommand) {
            CommandOutcome {
                success: false,
                stdout: String::new(),
                stderr: format!("{} failed", subcommand),
                exit_code: Some(1),
            }
        } else {
            CommandOutcome {
                success: true,
                stdout: format!("{} ok", subcommand),
                stderr: String::new(),
                exit_code: Some(0),
            }
        }
    }
}

/// An installer wired to fakes inside a scratch directory
pub struct Harness {
    pub dir: TempDir,
    pub layout: StorageLayout,
    pub config_store: Arc<ConfigStore>,
    pub backend: Arc<FakeBackend>,
    pub runner: Arc<FakeRunner>,
    pub installer: Arc<Installer>,
}

impl Harness {
    pub fn new(profile: InstallProfile, backend: FakeBackend, runner: FakeRunner) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let layout = StorageLayout::rooted(dir.path());
        std::fs::create_dir_all(&layout.app_dir).unwrap();

        let config_store = Arc::new(ConfigStore::new(layout.config_file()));
        let backend = Arc::new(backend);
        let runner = Arc::new(runner);
        let options = InstallerOptions {
            profile,
            ..Default::default()
        };
        let installer = Arc::new(Installer::new(
            options,
            layout.clone(),
            config_store.clone(),
            backend.clone(),
            runner.clone(),
        ));

        Self {
            dir,
            layout,
            config_store,
            backend,
            runner,
            installer,
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.layout.config_file().path().to_path_buf()
    }

    pub fn record_path(&self) -> PathBuf {
        self.layout.install_record_file().path().to_path_buf()
    }
}

pub fn base_body() -> Value {
    serde_json::json!({
        "SUPABASE_URL": "https://x.test",
        "SUPABASE_ANON_KEY": "anon",
        "ADMIN_EMAIL": "a@b.com",
        "ADMIN_PASSWORD": "pw",
    })
}

pub fn admin_body() -> Value {
    let mut body = base_body();
    body["SUPABASE_SERVICE_ROLE_KEY"] = Value::from("service-role");
    body
}

pub fn project_body() -> Value {
    let mut body = admin_body();
    body["SUPABASE_ACCESS_TOKEN"] = Value::from("sbp_token");
    body["SUPABASE_PROJECT_REF"] = Value::from("abcdefgh");
    body
}

pub fn request(body: Value) -> InstallRequest {
    serde_json::from_value(body).unwrap()
}
