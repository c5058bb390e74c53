//! `fln revert` — Best-effort removal of a previously installed discipline.
//!
//! Manual cleanup aid for runs that died before restoring the namespace.

use clap::Args;

use faultline_common::cmd::ShellRunner;
use faultline_common::constants::DEFAULT_INTERFACE;
use faultline_common::types::TargetPid;
use faultline_netem::NetemHandle;

/// Arguments for the `revert` command.
#[derive(Args, Debug)]
pub struct RevertArgs {
    /// PID owning the target network namespace.
    #[arg(long)]
    pub pid: u32,

    /// Network interface the discipline was applied to.
    #[arg(long, env = "FLN_NETWORK_INTERFACE", default_value = DEFAULT_INTERFACE)]
    pub interface: String,
}

/// Executes the `revert` command.
///
/// A benign "nothing to remove" failure from the kernel tool is still
/// reported as an error, with its raw output, so the operator can judge it.
///
/// # Errors
///
/// Returns an error if the PID is 0 or the removal command fails.
pub fn execute(args: RevertArgs) -> anyhow::Result<()> {
    let pid = TargetPid::new(args.pid)
        .ok_or_else(|| anyhow::anyhow!("PID 0 is not a valid namespace target"))?;

    let handle = NetemHandle::new(pid, args.interface);
    handle.remove(&ShellRunner)?;
    tracing::info!(pid = pid.as_raw(), interface = handle.interface(), "discipline removed");
    Ok(())
}
