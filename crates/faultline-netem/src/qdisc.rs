//! Netem qdisc installation and removal inside a target namespace.

use faultline_common::cmd::{shell_argv, CommandRunner};
use faultline_common::constants::{NSENTER_BIN, TC_BIN};
use faultline_common::error::{FaultlineError, Result};
use faultline_common::types::{FaultSpec, TargetPid};

/// Handle to the netem discipline of one interface in one namespace.
///
/// The interface is stored once and used for both installation and removal,
/// so the two directions can never drift apart.
#[derive(Debug, Clone)]
pub struct NetemHandle {
    pid: TargetPid,
    interface: String,
}

impl NetemHandle {
    /// Creates a handle for the given namespace-owning PID and interface.
    #[must_use]
    pub fn new(pid: TargetPid, interface: impl Into<String>) -> Self {
        Self {
            pid,
            interface: interface.into(),
        }
    }

    /// Returns the namespace-owning PID.
    #[must_use]
    pub const fn pid(&self) -> TargetPid {
        self.pid
    }

    /// Returns the interface the discipline is applied to.
    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Builds the shell command line that installs the discipline.
    ///
    /// The fault specification is appended verbatim; its grammar belongs to
    /// the kernel tool.
    #[must_use]
    pub fn inject_script(&self, spec: &FaultSpec) -> String {
        format!(
            "{NSENTER_BIN} -t {} -n {TC_BIN} qdisc add dev {} root netem {}",
            self.pid, self.interface, spec
        )
    }

    /// Builds the shell command line that deletes the root discipline.
    #[must_use]
    pub fn remove_script(&self) -> String {
        format!(
            "{NSENTER_BIN} -t {} -n {TC_BIN} qdisc delete dev {} root",
            self.pid, self.interface
        )
    }

    /// Installs the netem discipline inside the target namespace.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the command text and the tool's raw
    /// combined output if the command cannot be spawned or exits nonzero.
    pub fn inject(&self, runner: &dyn CommandRunner, spec: &FaultSpec) -> Result<()> {
        let script = self.inject_script(spec);
        tracing::info!(pid = self.pid.as_raw(), command = %script, "installing netem discipline");

        let output = runner.run(&shell_argv(&script))?;
        if !output.success() {
            return Err(FaultlineError::Injection {
                command: script,
                output: output.combined(),
            });
        }
        Ok(())
    }

    /// Deletes the root discipline from the target namespace.
    ///
    /// Removal with no discipline present fails with a benign kernel error;
    /// defensive callers log that and move on. Calling twice in sequence is
    /// harmless: the second call fails, it does not hang or panic.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the command text and the tool's raw
    /// combined output if the command cannot be spawned or exits nonzero.
    pub fn remove(&self, runner: &dyn CommandRunner) -> Result<()> {
        let script = self.remove_script();
        tracing::info!(pid = self.pid.as_raw(), command = %script, "removing netem discipline");

        let output = runner.run(&shell_argv(&script))?;
        if !output.success() {
            return Err(FaultlineError::Cleanup {
                command: script,
                output: output.combined(),
            });
        }
        Ok(())
    }
}
