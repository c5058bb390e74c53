//! The lifecycle state machine for one chaos run.
//!
//! `Init → PidResolved → Injected → Waiting → Cleaning → Done`, expressed
//! as sequential awaits on a single task. Cleanup runs on every exit path
//! except a resolution failure, where nothing was ever injected.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use faultline_common::cmd::CommandRunner;
use faultline_common::config::ExperimentConfig;
use faultline_common::error::{FaultlineError, Result};
use faultline_common::types::{
    ContainerRuntime, FaultSpec, InjectionState, LifecycleOutcome, TargetDescriptor,
};
use faultline_netem::NetemHandle;

use crate::events::{EventSink, ExperimentEvent};
use crate::resolve::TargetResolver;

/// Terminal report of one run: the outcome plus the error that produced it,
/// if any.
#[derive(Debug)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: LifecycleOutcome,
    /// The terminal error, for failure outcomes and failed cleanups.
    pub error: Option<FaultlineError>,
}

impl RunReport {
    /// Returns the process exit status for this report.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

/// How the combined wait resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitResolution {
    /// The chaos duration elapsed.
    Expired,
    /// A termination signal arrived first.
    Signalled,
}

/// Orchestrates resolve, inject, bounded wait, and guaranteed cleanup.
pub struct LifecycleController {
    config: ExperimentConfig,
    runner: Arc<dyn CommandRunner>,
    resolver: Box<dyn TargetResolver>,
    sink: Box<dyn EventSink>,
}

impl LifecycleController {
    /// Creates a controller over the given collaborators.
    #[must_use]
    pub fn new(
        config: ExperimentConfig,
        runner: Arc<dyn CommandRunner>,
        resolver: Box<dyn TargetResolver>,
        sink: Box<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            runner,
            resolver,
            sink,
        }
    }

    /// Runs the full lifecycle once.
    ///
    /// `shutdown` is the termination event raced against the duration
    /// timer: the production caller passes a signal listener, tests pass
    /// controllable futures. Whichever side of the race resolves first
    /// wins; the other is dropped.
    ///
    /// The PID is resolved exactly once, injection happens at most once,
    /// and removal runs exactly once on every path that reached injection.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> RunReport {
        let (handle, spec) = match self.prepare() {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(error = %e, "target resolution failed, nothing was injected");
                return RunReport {
                    outcome: LifecycleOutcome::FailedDuringInjection,
                    error: Some(e),
                };
            }
        };

        let mut state = InjectionState::NotInjected;
        if let Err(e) = handle.inject(self.runner.as_ref(), &spec) {
            tracing::error!(error = %e, "fault injection failed");
            // A rejected tc invocation can leave partial kernel-side state
            // behind, so removal still runs on this path.
            if let Err(cleanup_err) = handle.remove(self.runner.as_ref()) {
                tracing::warn!(
                    error = %cleanup_err,
                    state = %state,
                    "defensive removal reported an error"
                );
            }
            return RunReport {
                outcome: LifecycleOutcome::FailedDuringInjection,
                error: Some(e),
            };
        }
        state = InjectionState::Injected;

        self.emit_start_event();

        tracing::info!(
            duration_secs = self.config.duration_secs,
            "fault active, waiting for expiry or termination"
        );
        let resolution = wait(self.config.duration(), shutdown).await;

        tracing::info!(state = %state, "stopping the experiment");
        let removal = handle.remove(self.runner.as_ref());
        match (resolution, removal) {
            (WaitResolution::Expired, Ok(())) => {
                tracing::info!(experiment = %self.config.experiment, "chaos run completed");
                RunReport {
                    outcome: LifecycleOutcome::CompletedNormally,
                    error: None,
                }
            }
            (WaitResolution::Signalled, Ok(())) => RunReport {
                outcome: LifecycleOutcome::TerminatedBySignal,
                error: None,
            },
            (WaitResolution::Expired, Err(e)) => {
                tracing::error!(error = %e, "fault removal failed after the wait completed");
                RunReport {
                    outcome: LifecycleOutcome::FailedDuringCleanup,
                    error: Some(e),
                }
            }
            (WaitResolution::Signalled, Err(e)) => {
                tracing::error!(error = %e, "fault removal failed on the signal path");
                RunReport {
                    outcome: LifecycleOutcome::TerminatedBySignal,
                    error: Some(e),
                }
            }
        }
    }

    /// Resolution phase: validate configuration, parse the runtime kind,
    /// map the target to a container id, and resolve its init PID.
    ///
    /// The PID is derived once here and never re-derived for the rest of
    /// the run.
    fn prepare(&self) -> Result<(NetemHandle, FaultSpec)> {
        self.config.validate()?;
        let runtime = self.config.runtime.parse::<ContainerRuntime>()?;
        let target = TargetDescriptor {
            namespace: self.config.namespace.clone(),
            pod: self.config.pod.clone(),
            container: self.config.container.clone(),
            runtime,
            interface: self.config.interface.clone(),
        };

        let container_id = self.resolver.container_id(&target)?;
        let pid = faultline_cri::resolve_pid(self.runner.as_ref(), &container_id, runtime)?;
        let spec = FaultSpec::new(self.config.fault.clone())?;
        Ok((NetemHandle::new(pid, target.interface), spec))
    }

    /// Emits the lifecycle-start event, gated on a configured engine name.
    /// Best-effort: sink failures are logged and never abort the run.
    fn emit_start_event(&self) {
        let Some(engine) = self.config.engine.as_deref().filter(|e| !e.is_empty()) else {
            tracing::debug!("no engine configured, skipping event emission");
            return;
        };
        let event = ExperimentEvent::inject_started(
            &self.config.experiment,
            self.config.uid.clone(),
            &self.config.pod,
        );
        if let Err(e) = self.sink.record(&event) {
            tracing::warn!(error = %e, engine, "failed to record lifecycle event");
        }
    }
}

/// Races the duration timer against the termination event.
async fn wait(duration: Duration, shutdown: impl Future<Output = ()>) -> WaitResolution {
    tokio::select! {
        () = shutdown => {
            tracing::info!("termination signal received, abandoning wait");
            WaitResolution::Signalled
        }
        () = tokio::time::sleep(duration) => {
            tracing::info!("chaos duration elapsed");
            WaitResolution::Expired
        }
    }
}
