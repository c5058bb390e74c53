//! `fln run` — Execute one chaos experiment end to end.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use faultline_common::cmd::ShellRunner;
use faultline_common::config::ExperimentConfig;
use faultline_common::constants::{
    CRICTL_BIN, DEFAULT_CHAOS_DURATION_SECS, DEFAULT_INTERFACE, NSENTER_BIN, TC_BIN,
};
use faultline_runner::controller::LifecycleController;
use faultline_runner::events::{EventSink, FileEventSink, LogEventSink};
use faultline_runner::resolve::StaticResolver;
use faultline_runner::signal;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Experiment name, used in logs and event records.
    #[arg(long, env = "FLN_EXPERIMENT", default_value = "pod-network-fault")]
    pub experiment: String,

    /// Experiment-engine name. When unset, no events are emitted.
    #[arg(long, env = "FLN_ENGINE")]
    pub engine: Option<String>,

    /// Unique identifier of this run. Generated when unset.
    #[arg(long, env = "FLN_UID")]
    pub uid: Option<String>,

    /// Namespace of the target pod.
    #[arg(long = "target-namespace", env = "FLN_TARGET_NAMESPACE", default_value = "default")]
    pub namespace: String,

    /// Name of the target pod.
    #[arg(long, env = "FLN_TARGET_POD")]
    pub pod: String,

    /// Name of the target container inside the pod.
    #[arg(long, env = "FLN_TARGET_CONTAINER")]
    pub container: String,

    /// Fully-qualified container id, `<scheme>://<id>`.
    #[arg(long = "container-id", env = "FLN_CONTAINER_ID")]
    pub container_id: String,

    /// Container runtime kind: `containerd` or `crio`.
    #[arg(long, env = "FLN_CONTAINER_RUNTIME", default_value = "containerd")]
    pub runtime: String,

    /// Network interface to apply the discipline to.
    #[arg(long, env = "FLN_NETWORK_INTERFACE", default_value = DEFAULT_INTERFACE)]
    pub interface: String,

    /// Total chaos duration in seconds.
    #[arg(long, env = "FLN_CHAOS_DURATION", default_value_t = DEFAULT_CHAOS_DURATION_SECS)]
    pub duration: u64,

    /// Verbatim `tc netem` parameters, e.g. "delay 100ms 10ms".
    #[arg(long, env = "FLN_NETEM_ARGS")]
    pub fault: String,

    /// Append lifecycle events as JSON lines to this file.
    #[arg(long, env = "FLN_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}

/// Executes the `run` command.
///
/// Exits the process directly with the outcome's status code on any
/// non-success outcome; the signal path performs no further bookkeeping
/// after cleanup.
///
/// # Errors
///
/// Returns an error if the termination-signal listener cannot be set up.
pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    preflight();

    let config = ExperimentConfig {
        experiment: args.experiment,
        engine: args.engine,
        uid: args
            .uid
            .or_else(|| Some(uuid::Uuid::new_v4().to_string())),
        namespace: args.namespace,
        pod: args.pod,
        container: args.container,
        container_id: args.container_id,
        runtime: args.runtime,
        interface: args.interface,
        duration_secs: args.duration,
        fault: args.fault,
    };

    let sink: Box<dyn EventSink> = match args.events_file {
        Some(path) => Box::new(FileEventSink::new(path)),
        None => Box::new(LogEventSink),
    };
    let resolver = Box::new(StaticResolver::new(config.container_id.clone()));
    let controller =
        LifecycleController::new(config, Arc::new(ShellRunner), resolver, sink);

    let shutdown = signal::termination_signal()?;
    let report = controller.run(shutdown).await;

    match &report.error {
        Some(e) => tracing::error!(outcome = %report.outcome, error = %e, "chaos run failed"),
        None => tracing::info!(outcome = %report.outcome, "chaos run finished"),
    }
    if report.exit_code() != 0 {
        std::process::exit(report.exit_code());
    }
    Ok(())
}

/// Warns about missing host tooling before the run starts.
///
/// The run itself still fails with the tool's raw output if one is
/// genuinely absent; this only gives operators an earlier hint.
fn preflight() {
    for tool in [CRICTL_BIN, NSENTER_BIN, TC_BIN] {
        if which::which(tool).is_err() {
            tracing::warn!(tool, "tool not found on PATH, the experiment will fail when it is invoked");
        }
    }
}
