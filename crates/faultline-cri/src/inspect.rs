//! PID resolution through the CRI inspection tool.

use faultline_common::cmd::CommandRunner;
use faultline_common::constants::CRICTL_BIN;
use faultline_common::error::{FaultlineError, Result};
use faultline_common::types::{ContainerId, ContainerRuntime, TargetPid};

use crate::parse;

/// Resolves a container's init PID by inspecting it through the runtime.
///
/// A single attempt, no retries: if the runtime cannot describe the
/// container there is nothing to fault-inject, and a failing inspection
/// tool is unlikely to self-heal within the experiment window.
///
/// # Errors
///
/// Returns an error if the inspection tool cannot be spawned, exits
/// nonzero, or its output does not contain a nonzero PID.
pub fn resolve_pid(
    runner: &dyn CommandRunner,
    container_id: &ContainerId,
    runtime: ContainerRuntime,
) -> Result<TargetPid> {
    let argv = vec![
        CRICTL_BIN.to_string(),
        "inspect".to_string(),
        container_id.as_str().to_string(),
    ];

    tracing::debug!(container_id = %container_id, runtime = %runtime, "inspecting target container");
    let output = runner.run(&argv)?;
    if !output.success() {
        return Err(FaultlineError::Resolution {
            container_id: container_id.to_string(),
            message: format!("crictl inspect exited with status {}", output.exit_code),
            output: output.combined(),
        });
    }

    let pid = parse::parse_pid(&output.stdout, runtime, container_id)?;
    tracing::info!(container_id = %container_id, pid = pid.as_raw(), "resolved container init PID");
    Ok(pid)
}
