//! The command-runner capability.
//!
//! Every external-tool invocation in the workspace goes through
//! [`CommandRunner`], so the lifecycle controller depends on a single
//! one-operation capability rather than on a process-spawning mechanism.
//! Tests substitute a fake runner; production uses [`ShellRunner`].

use std::process::Command;

use crate::constants::SHELL_BIN;
use crate::error::{FaultlineError, Result};

/// Captured output of one external-tool invocation.
#[derive(Debug, Clone)]
pub struct RunnerOutput {
    /// Standard output from the command.
    pub stdout: String,
    /// Standard error from the command.
    pub stderr: String,
    /// Exit code returned by the command.
    pub exit_code: i32,
}

impl RunnerOutput {
    /// Returns true if the command exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns stdout and stderr joined, for diagnostics.
    #[must_use]
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined
    }
}

/// Capability to run an external command and capture its output.
pub trait CommandRunner: Send + Sync {
    /// Runs `argv[0]` with the remaining elements as arguments.
    ///
    /// A nonzero exit status is not an error at this layer; callers decide
    /// what a failing tool means for them.
    ///
    /// # Errors
    ///
    /// Returns an error if `argv` is empty or the process cannot be spawned.
    fn run(&self, argv: &[String]) -> Result<RunnerOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    fn run(&self, argv: &[String]) -> Result<RunnerOutput> {
        (**self).run(argv)
    }
}

/// Production runner backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, argv: &[String]) -> Result<RunnerOutput> {
        let (program, args) = argv.split_first().ok_or_else(|| FaultlineError::Config {
            message: "command is empty".into(),
        })?;

        tracing::debug!(program = %program, ?args, "running external command");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| FaultlineError::Io {
                context: format!("spawning {program}"),
                source: e,
            })?;

        Ok(RunnerOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Wraps a composed command line for execution through the shell.
///
/// Used where the command text must be interpreted as written, e.g. when a
/// verbatim fault specification is appended to a `tc` invocation.
#[must_use]
pub fn shell_argv(script: &str) -> Vec<String> {
    vec![SHELL_BIN.to_string(), "-c".to_string(), script.to_string()]
}
