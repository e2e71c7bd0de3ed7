//! Install profiles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How much of the backend an install provisions. Each profile includes
/// everything the previous one does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallProfile {
    /// Write the runtime config and install record only
    Basic,
    /// Also create and promote the admin account
    Admin,
    /// Also link and migrate the remote project, set secrets and seed data
    #[default]
    Project,
}

impl InstallProfile {
    pub fn provisions_admin(&self) -> bool {
        *self >= InstallProfile::Admin
    }

    pub fn manages_project(&self) -> bool {
        *self == InstallProfile::Project
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstallProfile::Basic => "basic",
            InstallProfile::Admin => "admin",
            InstallProfile::Project => "project",
        }
    }
}

impl fmt::Display for InstallProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(InstallProfile::Basic),
            "admin" => Ok(InstallProfile::Admin),
            "project" | "full" => Ok(InstallProfile::Project),
            _ => Err(format!("Invalid install profile: {}", s)),
        }
    }
}
