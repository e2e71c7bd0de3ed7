//! Subprocess runner

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::deploy::command::CliCommand;

/// What a finished command produced. A non-zero exit is data, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process never started or was killed by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutcome {
    /// Outcome for a process that could not be started
    pub fn not_started(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: reason.into(),
            exit_code: None,
        }
    }
}

/// Runs external commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command: &CliCommand,
        workdir: &Path,
        env: &HashMap<String, String>,
    ) -> CommandOutcome;
}

/// Runs commands as child processes of the server
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &CliCommand,
        workdir: &Path,
        env: &HashMap<String, String>,
    ) -> CommandOutcome {
        debug!("Running `{}` in {:?}", command, workdir);

        let child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(workdir)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to start `{}`: {}", command, e);
                return CommandOutcome::not_started(format!(
                    "Failed to start {}: {}",
                    command.program, e
                ));
            }
        };

        match child.wait_with_output().await {
            Ok(output) => {
                let exit_code = output.status.code();
                debug!("`{}` exited with {:?}", command, exit_code);
                CommandOutcome {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    exit_code,
                }
            }
            Err(e) => {
                warn!("Failed waiting on `{}`: {}", command, e);
                CommandOutcome::not_started(format!("Failed waiting on {}: {}", command.program, e))
            }
        }
    }
}
