//! Server state

use std::sync::Arc;

use crate::installer::install::Installer;
use crate::storage::layout::StorageLayout;
use crate::storage::runtime_config::ConfigStore;

/// Server state shared across handlers
pub struct ServerState {
    pub layout: StorageLayout,
    pub config_store: Arc<ConfigStore>,
    pub installer: Arc<Installer>,
}

impl ServerState {
    pub fn new(
        layout: StorageLayout,
        config_store: Arc<ConfigStore>,
        installer: Arc<Installer>,
    ) -> Self {
        Self {
            layout,
            config_store,
            installer,
        }
    }
}
