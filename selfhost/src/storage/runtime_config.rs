//! Runtime configuration module served to the browser
//!
//! The frontend loads `/config.js` before its bundle and reads connection
//! parameters from `window.__APP_CONFIG__`. The store keeps the latest
//! rendered script in memory behind a lock and mirrors it to disk with an
//! atomic rename, so readers never see a half-written module.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::InstallerError;
use crate::filesys::file::File;

/// Connection parameters handed to the frontend. Absent values render as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(rename = "SUPABASE_URL", default)]
    pub supabase_url: String,

    #[serde(rename = "SUPABASE_ANON_KEY", default)]
    pub supabase_anon_key: String,

    #[serde(rename = "ZOOM_WEBHOOK_URL", default)]
    pub zoom_webhook_url: String,
}

impl RuntimeConfig {
    /// Render the browser module. Values are inserted verbatim; callers
    /// supply well-formed strings.
    pub fn render(&self) -> String {
        format!(
            "window.__APP_CONFIG__ = {{\n  SUPABASE_URL: \"{}\",\n  SUPABASE_ANON_KEY: \"{}\",\n  ZOOM_WEBHOOK_URL: \"{}\"\n}};\n",
            self.supabase_url, self.supabase_anon_key, self.zoom_webhook_url
        )
    }
}

/// One published generation of the runtime config
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub version: u64,
    pub published_at: DateTime<Utc>,
    pub config: RuntimeConfig,
    pub script: String,
}

/// Single owner of the runtime config module
#[derive(Debug)]
pub struct ConfigStore {
    file: File,
    current: RwLock<Option<Arc<ConfigSnapshot>>>,
}

impl ConfigStore {
    pub fn new(file: File) -> Self {
        Self {
            file,
            current: RwLock::new(None),
        }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    /// Render, persist and swap in a new snapshot. The in-memory copy only
    /// changes once the file is on disk.
    pub async fn publish(&self, config: RuntimeConfig) -> Result<Arc<ConfigSnapshot>, InstallerError> {
        let script = config.render();

        let mut current = self.current.write().await;
        self.file.write_atomic(script.as_bytes()).await?;

        let version = current.as_ref().map(|s| s.version + 1).unwrap_or(1);
        let snapshot = Arc::new(ConfigSnapshot {
            version,
            published_at: Utc::now(),
            config,
            script,
        });
        *current = Some(snapshot.clone());

        info!("Published runtime config v{} to {:?}", version, self.file.path());
        Ok(snapshot)
    }

    /// Publish at startup. Failures are logged and otherwise ignored.
    pub async fn seed(&self, config: RuntimeConfig) {
        if let Err(e) = self.publish(config).await {
            warn!("Unable to write runtime config {:?}: {}", self.file.path(), e);
        }
    }

    /// Latest published snapshot, if any
    pub async fn snapshot(&self) -> Option<Arc<ConfigSnapshot>> {
        self.current.read().await.clone()
    }

    /// Script to serve: the published snapshot, else whatever is on disk
    pub async fn script(&self) -> Option<Vec<u8>> {
        if let Some(snapshot) = self.snapshot().await {
            return Some(snapshot.script.clone().into_bytes());
        }
        self.file.read_bytes().await.ok()
    }
}
