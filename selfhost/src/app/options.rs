//! Application configuration options
//!
//! Values come from the process environment (after loading `.env`), and
//! `--key=value` command-line arguments override them.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::InstallerError;
use crate::installer::install::{InstallerOptions, DEFAULT_WEBHOOK_FUNCTION};
use crate::installer::profile::InstallProfile;
use crate::logs::{LogLevel, LogOptions};
use crate::storage::layout::StorageLayout;
use crate::storage::runtime_config::RuntimeConfig;

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub server: ServerOptions,

    /// Asset, data and project directories
    pub layout: StorageLayout,

    pub installer: InstallerOptions,

    pub log: LogOptions,

    /// Runtime config written at startup, before any install
    pub seed_config: RuntimeConfig,
}

/// HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
        }
    }
}

/// Parse `--key=value` and bare `--flag` arguments
pub fn parse_cli_args<I: IntoIterator<Item = String>>(args: I) -> HashMap<String, String> {
    let mut cli_args = HashMap::new();
    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }
    cli_args
}

/// Looks a setting up on the command line first, then in the environment
struct Sources<'a> {
    env: &'a HashMap<String, String>,
    cli: &'a HashMap<String, String>,
}

impl Sources<'_> {
    fn get(&self, env_key: &str, cli_key: &str) -> Option<String> {
        self.cli
            .get(cli_key)
            .or_else(|| self.env.get(env_key))
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn get_or(&self, env_key: &str, cli_key: &str, default: &str) -> String {
        self.get(env_key, cli_key)
            .unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, env_key: &str, cli_key: &str, default: T) -> Result<T, InstallerError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(env_key, cli_key) {
            Some(raw) => raw
                .parse()
                .map_err(|e| InstallerError::ConfigError(format!("{}: {}", env_key, e))),
            None => Ok(default),
        }
    }

    fn flag(&self, env_key: &str, cli_key: &str) -> Result<bool, InstallerError> {
        match self.get(env_key, cli_key).map(|v| v.to_lowercase()) {
            None => Ok(false),
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
            Some(v) => Err(InstallerError::ConfigError(format!(
                "{}: expected a boolean, got {}",
                env_key, v
            ))),
        }
    }
}

impl AppOptions {
    /// Load options from the process environment and command line
    pub fn load(cli_args: &HashMap<String, String>) -> Result<Self, InstallerError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(InstallerError::ConfigError(format!("Invalid .env file: {}", e)));
            }
        }
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(&env, cli_args)
    }

    /// Build options from explicit environment and command-line maps
    pub fn from_sources(
        env: &HashMap<String, String>,
        cli_args: &HashMap<String, String>,
    ) -> Result<Self, InstallerError> {
        let sources = Sources { env, cli: cli_args };
        let defaults = AppOptions::default();

        let server = ServerOptions {
            host: sources.get_or("HOST", "host", &defaults.server.host),
            port: sources.parse("PORT", "port", defaults.server.port)?,
        };

        let layout = StorageLayout::new(
            sources.get_or("APP_DIR", "app-dir", "dist"),
            sources.get_or("DATA_DIR", "data-dir", "."),
            sources.get_or("PROJECT_DIR", "project-dir", "."),
        );

        let installer = InstallerOptions {
            profile: sources.parse("INSTALL_PROFILE", "profile", InstallProfile::default())?,
            cli_program: sources.get_or("SUPABASE_CLI", "cli", &defaults.installer.cli_program),
            webhook_function: sources.get_or("WEBHOOK_FUNCTION", "webhook-function", DEFAULT_WEBHOOK_FUNCTION),
        };

        let log = LogOptions {
            log_level: sources.parse("LOG_LEVEL", "log-level", LogLevel::default())?,
            json_format: sources.flag("LOG_JSON", "log-json")?,
            log_dir: sources.get("LOG_DIR", "log-dir").map(PathBuf::from),
            ..Default::default()
        };

        let env_value = |key: &str| env.get(key).cloned().unwrap_or_default();
        let seed_config = RuntimeConfig {
            supabase_url: env_value("SUPABASE_URL"),
            supabase_anon_key: env_value("SUPABASE_ANON_KEY"),
            zoom_webhook_url: env_value("ZOOM_WEBHOOK_URL"),
        };

        Ok(Self {
            server,
            layout,
            installer,
            log,
            seed_config,
        })
    }
}
