//! Utility functions

use serde::{Deserialize, Serialize};

/// Version information for the installer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// True when a request field carries a usable value. Empty strings count as absent.
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
