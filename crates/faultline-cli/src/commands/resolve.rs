//! `fln resolve` — Resolve and print a target container's init PID.

use clap::Args;

use faultline_common::cmd::ShellRunner;
use faultline_common::types::{ContainerId, ContainerRuntime};

/// Arguments for the `resolve` command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Fully-qualified container id, `<scheme>://<id>`.
    #[arg(long = "container-id", env = "FLN_CONTAINER_ID")]
    pub container_id: String,

    /// Container runtime kind: `containerd` or `crio`.
    #[arg(long, env = "FLN_CONTAINER_RUNTIME", default_value = "containerd")]
    pub runtime: String,
}

/// Executes the `resolve` command.
///
/// Prints the resolved PID on stdout so it can be fed to other tooling.
///
/// # Errors
///
/// Returns an error if the runtime kind is unsupported, the id is
/// malformed, or inspection fails.
pub fn execute(args: ResolveArgs) -> anyhow::Result<()> {
    let runtime: ContainerRuntime = args.runtime.parse()?;
    let id = ContainerId::from_qualified(&args.container_id)?;
    let pid = faultline_cri::resolve_pid(&ShellRunner, &id, runtime)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{pid}");
    }
    Ok(())
}
