//! Install record file management

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::InstallerError;
use crate::filesys::file::File;

/// Credentials kept on disk after an install so operators can find them again.
///
/// Stored in plaintext; the file is restricted to its owner where the
/// platform allows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    #[serde(rename = "ADMIN_EMAIL")]
    pub admin_email: String,

    #[serde(rename = "ADMIN_PASSWORD")]
    pub admin_password: String,

    #[serde(rename = "SUPABASE_ACCESS_TOKEN", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(rename = "SUPABASE_PROJECT_REF", default, skip_serializing_if = "Option::is_none")]
    pub project_ref: Option<String>,
}

/// Write the record, replacing any previous one
pub async fn save_install_record(
    file: &File,
    record: &InstallRecord,
) -> Result<(), InstallerError> {
    file.write_json(record).await?;
    if let Err(e) = file.set_permissions_600().await {
        warn!("Unable to restrict permissions on {:?}: {}", file.path(), e);
    }
    debug!("Install record saved to {:?}", file.path());
    Ok(())
}

/// Load a previously saved record
pub async fn load_install_record(file: &File) -> Result<InstallRecord, InstallerError> {
    let contents = file.read_string().await?;
    serde_json::from_str(&contents)
        .map_err(|e| InstallerError::StorageError(format!("Invalid install record: {}", e)))
}
