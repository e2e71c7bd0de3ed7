//! Backend CLI invocations used to link and migrate a project

use crate::deploy::command::CliCommand;

/// Default CLI binary
pub const DEFAULT_PROGRAM: &str = "supabase";

/// Builds commands for the backend CLI
#[derive(Debug, Clone)]
pub struct ProjectCli {
    program: String,
}

impl ProjectCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self) -> CliCommand {
        CliCommand::new(&self.program)
    }

    /// Scaffold the local project directory
    pub fn init(&self) -> CliCommand {
        self.command().arg("init")
    }

    pub fn login(&self, access_token: &str) -> CliCommand {
        self.command().args(["login", "--token"]).secret_arg(access_token)
    }

    pub fn link(&self, project_ref: &str) -> CliCommand {
        self.command().args(["link", "--project-ref", project_ref])
    }

    /// Apply local migrations to the linked database
    pub fn db_push(&self) -> CliCommand {
        self.command().args(["db", "push"])
    }

    /// Set function secrets; every value is masked in logs
    pub fn set_secrets<'a>(
        &self,
        secrets: impl IntoIterator<Item = (&'a str, &'a str)>,
        project_ref: &str,
    ) -> CliCommand {
        let mut command = self.command().args(["secrets", "set"]);
        for (name, value) in secrets {
            command = command.secret_arg(format!("{}={}", name, value));
        }
        command.args(["--project-ref", project_ref])
    }

    pub fn deploy_function(&self, function: &str, project_ref: &str) -> CliCommand {
        self.command()
            .args(["functions", "deploy", function, "--project-ref", project_ref])
    }
}

impl Default for ProjectCli {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}
