//! External command description

use std::fmt;

/// Flags whose following argument is a credential
const SECRET_FLAGS: [&str; 3] = ["--token", "-p", "--password"];

/// A program and its arguments, passed to the OS without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Indexes of arguments that must not appear in logs
    secret_args: Vec<usize>,
}

impl CliCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secret_args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add an argument that is masked when the command is displayed
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secret_args.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    fn is_secret(&self, index: usize) -> bool {
        self.secret_args.contains(&index)
            || (index > 0 && SECRET_FLAGS.contains(&self.args[index - 1].as_str()))
    }
}

impl fmt::Display for CliCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for (index, arg) in self.args.iter().enumerate() {
            if !self.is_secret(index) {
                write!(f, " {}", arg)?;
            } else if let Some((name, _)) = arg.split_once('=') {
                write!(f, " {}=***", name)?;
            } else {
                write!(f, " ***")?;
            }
        }
        Ok(())
    }
}
