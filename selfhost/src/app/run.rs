//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::app::options::AppOptions;
use crate::deploy::runner::ProcessRunner;
use crate::errors::InstallerError;
use crate::http::client::HttpBackend;
use crate::installer::install::Installer;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::storage::runtime_config::ConfigStore;

/// Run the installer server until `shutdown_signal` resolves
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), InstallerError> {
    info!("Initializing installer (profile {})...", options.installer.profile);

    let state = init_state(&options).await?;
    let (_, handle) = serve(&options.server, state, shutdown_signal).await?;

    handle
        .await
        .map_err(|e| InstallerError::ServerError(format!("Server task failed: {}", e)))??;

    info!("Server stopped");
    Ok(())
}

/// Seed the runtime config and wire the installer to the real backend and CLI
pub async fn init_state(options: &AppOptions) -> Result<Arc<ServerState>, InstallerError> {
    let app_dir = options.layout.app_dir();
    if !app_dir.exists().await {
        warn!("Asset directory {:?} does not exist", app_dir.path());
    }

    let config_store = Arc::new(ConfigStore::new(options.layout.config_file()));
    config_store.seed(options.seed_config.clone()).await;

    let installer = Installer::new(
        options.installer.clone(),
        options.layout.clone(),
        config_store.clone(),
        Arc::new(HttpBackend::new()?),
        Arc::new(ProcessRunner),
    );

    Ok(Arc::new(ServerState::new(
        options.layout.clone(),
        config_store,
        Arc::new(installer),
    )))
}
