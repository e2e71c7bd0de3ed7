//! Install orchestration
//!
//! One `/install` call runs a fixed sequence: validate, write the runtime
//! config and install record, link and migrate the remote project, set
//! function secrets, seed storage and settings, then provision the admin
//! account. Steps run one after another. Only validation, the config
//! write and the project link steps (init, login, link, push) can stop an
//! install; everything after them is best effort and only logged.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

use crate::deploy::cli::ProjectCli;
use crate::deploy::command::CliCommand;
use crate::deploy::runner::CommandRunner;
use crate::errors::InstallerError;
use crate::http::backend::BackendApi;
use crate::http::client::ServiceTarget;
use crate::installer::profile::InstallProfile;
use crate::installer::request::{AdminCredentials, InstallRequest, ProjectLink, ValidatedInstall};
use crate::installer::steps::{InstallOutcome, StepLog, StepRecord};
use crate::models::settings::baseline_settings;
use crate::models::user::find_user_id;
use crate::storage::install_record::save_install_record;
use crate::storage::layout::StorageLayout;
use crate::storage::runtime_config::ConfigStore;

/// Default edge function deployed when a webhook secret is supplied
pub const DEFAULT_WEBHOOK_FUNCTION: &str = "zoom-webhook";

/// Knobs for the installer
#[derive(Debug, Clone)]
pub struct InstallerOptions {
    pub profile: InstallProfile,
    pub cli_program: String,
    pub webhook_function: String,
}

impl Default for InstallerOptions {
    fn default() -> Self {
        Self {
            profile: InstallProfile::default(),
            cli_program: crate::deploy::cli::DEFAULT_PROGRAM.to_string(),
            webhook_function: DEFAULT_WEBHOOK_FUNCTION.to_string(),
        }
    }
}

/// Runs installs against a backend and a CLI
pub struct Installer {
    options: InstallerOptions,
    layout: StorageLayout,
    config_store: Arc<ConfigStore>,
    backend: Arc<dyn BackendApi>,
    runner: Arc<dyn CommandRunner>,
    cli: ProjectCli,
}

impl Installer {
    pub fn new(
        options: InstallerOptions,
        layout: StorageLayout,
        config_store: Arc<ConfigStore>,
        backend: Arc<dyn BackendApi>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        let cli = ProjectCli::new(&options.cli_program);
        Self {
            options,
            layout,
            config_store,
            backend,
            runner,
            cli,
        }
    }

    pub fn profile(&self) -> InstallProfile {
        self.options.profile
    }

    /// Run one install. `Err` only for missing input or a failed config
    /// write; a failed project step yields `Ok` with `ok: false`.
    pub async fn install(&self, request: InstallRequest) -> Result<InstallOutcome, InstallerError> {
        let install = request.validate(self.options.profile)?;
        info!(
            "Installing with profile {} for {}",
            self.options.profile, install.admin.email
        );

        self.config_store.publish(install.config.clone()).await?;
        self.save_record(&install).await;

        let mut steps = None;
        if let Some(project) = &install.project {
            let mut log = StepLog::new();
            if !self.link_project(project, &mut log).await {
                warn!("Install aborted after {} step(s)", log.len());
                return Ok(InstallOutcome::aborted(log));
            }
            if let Some(service) = &install.service {
                self.configure_functions(service, project, &mut log).await;
                self.bootstrap_data(service).await;
            }
            steps = Some(log);
        }

        if let Some(service) = &install.service {
            self.provision_admin(service, &install.admin).await;
        }

        info!("Install finished");
        Ok(InstallOutcome::succeeded(steps))
    }

    async fn save_record(&self, install: &ValidatedInstall) {
        let file = self.layout.install_record_file();
        if let Err(e) = save_install_record(&file, &install.install_record()).await {
            warn!("Unable to save install record {:?}: {}", file.path(), e);
        }
    }

    async fn run_step(
        &self,
        step: &str,
        command: CliCommand,
        env: &HashMap<String, String>,
    ) -> StepRecord {
        info!("Step {}: {}", step, command);
        let outcome = self
            .runner
            .run(&command, self.project_dir(), env)
            .await;
        if !outcome.success {
            warn!("Step {} failed (exit {:?})", step, outcome.exit_code);
        }
        StepRecord::from_outcome(step, outcome)
    }

    fn project_dir(&self) -> &Path {
        &self.layout.project_dir
    }

    /// Init (when needed), login, link and push. Stops at the first failure.
    async fn link_project(&self, project: &ProjectLink, log: &mut StepLog) -> bool {
        let env = cli_env(project);

        if self.layout.project_config_file().exists().await {
            debug!("Project already initialized, skipping init");
        } else if !log.push(self.run_step("init", self.cli.init(), &env).await) {
            return false;
        }

        let steps = [
            ("login", self.cli.login(project.access_token.expose_secret())),
            ("link", self.cli.link(&project.project_ref)),
            ("push", self.cli.db_push()),
        ];
        for (step, command) in steps {
            if !log.push(self.run_step(step, command, &env).await) {
                return false;
            }
        }
        true
    }

    /// Function secrets and the optional webhook function. Failures are
    /// recorded but never stop the install.
    async fn configure_functions(&self, service: &ServiceTarget, project: &ProjectLink, log: &mut StepLog) {
        let env = cli_env(project);
        let project_ref = project.project_ref.as_str();

        let secrets = self.cli.set_secrets(
            [
                ("PROJECT_URL", service.url.as_str()),
                ("SERVICE_ROLE_KEY", service.service_role_key.expose_secret()),
            ],
            project_ref,
        );
        log.push(self.run_step("secrets", secrets, &env).await);

        if let Some(webhook_secret) = &project.webhook_secret {
            let command = self
                .cli
                .set_secrets([("ZOOM_WEBHOOK_SECRET", webhook_secret.expose_secret())], project_ref);
            log.push(self.run_step("webhook-secret", command, &env).await);

            let command = self
                .cli
                .deploy_function(&self.options.webhook_function, project_ref);
            log.push(self.run_step("deploy-function", command, &env).await);
        }
    }

    /// Uploads bucket and baseline settings rows
    async fn bootstrap_data(&self, service: &ServiceTarget) {
        if let Err(e) = self.backend.create_uploads_bucket(service).await {
            warn!("Unable to create uploads bucket: {}", e);
        }
        for row in baseline_settings() {
            if let Err(e) = self.backend.upsert_setting(service, &row).await {
                warn!("Unable to upsert setting {}: {}", row.key, e);
            }
        }
    }

    /// Create the admin account, or find the existing one, then promote it.
    /// Returns the user id that was promoted.
    async fn provision_admin(&self, service: &ServiceTarget, admin: &AdminCredentials) -> Option<String> {
        let created = match self.backend.create_admin(service, &admin.email, &admin.password).await {
            Ok(user) => user.id.filter(|id| !id.is_empty()),
            Err(e) => {
                debug!("Admin creation failed, looking for an existing account: {}", e);
                None
            }
        };

        let user_id = match created {
            Some(id) => Some(id),
            None => match self.backend.list_users(service).await {
                Ok(users) => find_user_id(&users, &admin.email),
                Err(e) => {
                    warn!("Unable to list users: {}", e);
                    None
                }
            },
        };

        let Some(user_id) = user_id else {
            warn!("No account found for {}; admin not provisioned", admin.email);
            return None;
        };

        if let Err(e) = self.backend.update_user(service, &user_id).await {
            warn!("Unable to update admin user {}: {}", user_id, e);
        }
        if let Err(e) = self.backend.upsert_profile(service, &user_id).await {
            warn!("Unable to upsert admin profile {}: {}", user_id, e);
        }
        if let Err(e) = self.backend.upsert_admin_role(service, &user_id).await {
            warn!("Unable to upsert admin role {}: {}", user_id, e);
        }

        info!("Admin account {} provisioned", user_id);
        Some(user_id)
    }
}

/// Environment handed to every CLI step
fn cli_env(project: &ProjectLink) -> HashMap<String, String> {
    let mut env = HashMap::from([(
        "SUPABASE_ACCESS_TOKEN".to_string(),
        project.access_token.expose_secret().to_string(),
    )]);
    if let Some(password) = &project.db_password {
        env.insert(
            "SUPABASE_DB_PASSWORD".to_string(),
            password.expose_secret().to_string(),
        );
    }
    env
}
