//! End-to-end lifecycle tests for the faultline runner.
//!
//! These tests drive the full controller pipeline against a recording fake
//! runner and a paused clock:
//! 1. PID resolution through the inspection tool
//! 2. Fault injection before the wait begins
//! 3. The duration/signal race
//! 4. Guaranteed, exactly-once cleanup on every post-injection path

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use faultline_common::cmd::{CommandRunner, RunnerOutput};
use faultline_common::config::ExperimentConfig;
use faultline_common::error::{FaultlineError, Result};
use faultline_common::types::LifecycleOutcome;
use faultline_runner::controller::LifecycleController;
use faultline_runner::events::{EventSink, ExperimentEvent};
use faultline_runner::resolve::StaticResolver;

// ── Test doubles ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    Inspect,
    Inject,
    Remove,
}

#[derive(Debug, Clone)]
struct RecordedCall {
    kind: CallKind,
    at: tokio::time::Instant,
}

/// Fake runner with scripted responses per tool invocation kind.
struct FakeRunner {
    calls: Mutex<Vec<RecordedCall>>,
    inspect_json: String,
    inspect_exit: i32,
    inject_exit: i32,
    inject_stderr: String,
    remove_exit: i32,
    remove_stderr: String,
}

impl FakeRunner {
    fn happy() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            inspect_json: r#"{"info": {"pid": 4321}}"#.into(),
            inspect_exit: 0,
            inject_exit: 0,
            inject_stderr: String::new(),
            remove_exit: 0,
            remove_stderr: String::new(),
        }
    }

    fn classify(argv: &[String]) -> CallKind {
        if argv[0] == "crictl" {
            return CallKind::Inspect;
        }
        let script = &argv[2];
        if script.contains("qdisc add") {
            CallKind::Inject
        } else {
            assert!(script.contains("qdisc delete"), "unexpected script: {script}");
            CallKind::Remove
        }
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, kind: CallKind) -> usize {
        self.calls().iter().filter(|c| c.kind == kind).count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, argv: &[String]) -> Result<RunnerOutput> {
        let kind = Self::classify(argv);
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            at: tokio::time::Instant::now(),
        });
        let (stdout, stderr, exit_code) = match kind {
            CallKind::Inspect => (self.inspect_json.clone(), String::new(), self.inspect_exit),
            CallKind::Inject => (String::new(), self.inject_stderr.clone(), self.inject_exit),
            CallKind::Remove => (String::new(), self.remove_stderr.clone(), self.remove_exit),
        };
        Ok(RunnerOutput {
            stdout,
            stderr,
            exit_code,
        })
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<ExperimentEvent>>,
}

impl EventSink for RecordingSink {
    fn record(&self, event: &ExperimentEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

// ── Harness ──────────────────────────────────────────────────────────

fn config(duration_secs: u64) -> ExperimentConfig {
    ExperimentConfig {
        experiment: "pod-network-loss".into(),
        engine: Some("chaos-engine".into()),
        uid: Some("run-1".into()),
        namespace: "default".into(),
        pod: "web-0".into(),
        container: "app".into(),
        container_id: "containerd://3f9a0c".into(),
        runtime: "containerd".into(),
        interface: "eth0".into(),
        duration_secs,
        fault: "delay 100ms 10ms distribution normal".into(),
    }
}

fn controller(
    cfg: ExperimentConfig,
    runner: &Arc<FakeRunner>,
    sink: &Arc<RecordingSink>,
) -> LifecycleController {
    let resolver = Box::new(StaticResolver::new(cfg.container_id.clone()));
    let runner_concrete = Arc::clone(runner);
    let runner: Arc<dyn CommandRunner> = runner_concrete;
    LifecycleController::new(cfg, runner, resolver, Box::new(Arc::clone(sink)))
}

// ── Scenario A: natural expiry ───────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn expiry_completes_normally_with_one_removal() {
    let runner = Arc::new(FakeRunner::happy());
    let sink = Arc::new(RecordingSink::default());
    let started = tokio::time::Instant::now();

    let report = controller(config(5), &runner, &sink)
        .run(std::future::pending())
        .await;

    assert_eq!(report.outcome, LifecycleOutcome::CompletedNormally);
    assert!(report.error.is_none());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(started.elapsed(), Duration::from_secs(5));

    assert_eq!(runner.count(CallKind::Inspect), 1);
    assert_eq!(runner.count(CallKind::Inject), 1);
    assert_eq!(runner.count(CallKind::Remove), 1);
}

#[tokio::test(start_paused = true)]
async fn injection_completes_before_wait_and_removal_starts_after() {
    let runner = Arc::new(FakeRunner::happy());
    let sink = Arc::new(RecordingSink::default());
    let started = tokio::time::Instant::now();

    let _ = controller(config(5), &runner, &sink)
        .run(std::future::pending())
        .await;

    let calls = runner.calls();
    assert_eq!(
        calls.iter().map(|c| c.kind).collect::<Vec<_>>(),
        vec![CallKind::Inspect, CallKind::Inject, CallKind::Remove]
    );
    // Injection happens before the timer starts, removal only after it
    // resolves.
    assert_eq!(calls[1].at, started);
    assert_eq!(calls[2].at, started + Duration::from_secs(5));
}

// ── Scenario B: signal precedence ────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn early_signal_interrupts_wait_and_still_cleans_up() {
    let runner = Arc::new(FakeRunner::happy());
    let sink = Arc::new(RecordingSink::default());
    let started = tokio::time::Instant::now();

    let shutdown = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
    };
    let report = controller(config(30), &runner, &sink).run(shutdown).await;

    assert_eq!(report.outcome, LifecycleOutcome::TerminatedBySignal);
    assert!(report.error.is_none());
    assert_ne!(report.exit_code(), 0);
    assert_eq!(started.elapsed(), Duration::from_secs(1));
    assert_eq!(runner.count(CallKind::Remove), 1);
}

// ── Scenario C: resolution failure ───────────────────────────────────

#[tokio::test(start_paused = true)]
async fn zero_pid_fails_resolution_with_no_injection_or_removal() {
    let runner = Arc::new(FakeRunner {
        inspect_json: r#"{"info": {"pid": 0}}"#.into(),
        ..FakeRunner::happy()
    });
    let sink = Arc::new(RecordingSink::default());

    let report = controller(config(5), &runner, &sink)
        .run(std::future::pending())
        .await;

    assert_eq!(report.outcome, LifecycleOutcome::FailedDuringInjection);
    assert!(matches!(
        report.error,
        Some(FaultlineError::Resolution { .. })
    ));
    assert_ne!(report.exit_code(), 0);
    assert_eq!(runner.count(CallKind::Inject), 0);
    assert_eq!(runner.count(CallKind::Remove), 0);
}

#[tokio::test(start_paused = true)]
async fn unsupported_runtime_fails_before_any_tool_runs() {
    let runner = Arc::new(FakeRunner::happy());
    let sink = Arc::new(RecordingSink::default());
    let cfg = ExperimentConfig {
        runtime: "docker".into(),
        ..config(5)
    };

    let report = controller(cfg, &runner, &sink)
        .run(std::future::pending())
        .await;

    assert_eq!(report.outcome, LifecycleOutcome::FailedDuringInjection);
    assert!(matches!(
        report.error,
        Some(FaultlineError::UnsupportedRuntime { .. })
    ));
    assert!(runner.calls().is_empty());
}

// ── Scenario D: injection failure ────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn failed_injection_surfaces_output_and_still_removes() {
    let runner = Arc::new(FakeRunner {
        inject_exit: 2,
        inject_stderr: "RTNETLINK answers: Operation not permitted\n".into(),
        ..FakeRunner::happy()
    });
    let sink = Arc::new(RecordingSink::default());

    let report = controller(config(5), &runner, &sink)
        .run(std::future::pending())
        .await;

    assert_eq!(report.outcome, LifecycleOutcome::FailedDuringInjection);
    match report.error {
        Some(FaultlineError::Injection { output, .. }) => {
            assert!(output.contains("Operation not permitted"));
        }
        other => panic!("expected injection error, got {other:?}"),
    }
    assert_eq!(runner.count(CallKind::Remove), 1);
}

// ── Cleanup failures ─────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn failed_removal_after_expiry_is_a_cleanup_failure() {
    let runner = Arc::new(FakeRunner {
        remove_exit: 2,
        remove_stderr: "Error: Cannot delete qdisc with handle of zero.\n".into(),
        ..FakeRunner::happy()
    });
    let sink = Arc::new(RecordingSink::default());
    let started = tokio::time::Instant::now();

    let report = controller(config(5), &runner, &sink)
        .run(std::future::pending())
        .await;

    assert_eq!(report.outcome, LifecycleOutcome::FailedDuringCleanup);
    assert!(matches!(report.error, Some(FaultlineError::Cleanup { .. })));
    // The wait still completed; the failure does not reverse it.
    assert_eq!(started.elapsed(), Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn failed_removal_on_signal_path_keeps_signal_outcome() {
    let runner = Arc::new(FakeRunner {
        remove_exit: 2,
        remove_stderr: "Error: Cannot delete qdisc with handle of zero.\n".into(),
        ..FakeRunner::happy()
    });
    let sink = Arc::new(RecordingSink::default());

    let report = controller(config(30), &runner, &sink).run(async {}).await;

    assert_eq!(report.outcome, LifecycleOutcome::TerminatedBySignal);
    assert!(matches!(report.error, Some(FaultlineError::Cleanup { .. })));
    assert_ne!(report.exit_code(), 0);
}

// ── Event emission ───────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn start_event_is_emitted_once_when_engine_is_configured() {
    let runner = Arc::new(FakeRunner::happy());
    let sink = Arc::new(RecordingSink::default());

    let _ = controller(config(5), &runner, &sink)
        .run(std::future::pending())
        .await;

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].reason, "ChaosInject");
    assert_eq!(events[0].experiment, "pod-network-loss");
    assert_eq!(events[0].uid.as_deref(), Some("run-1"));
}

#[tokio::test(start_paused = true)]
async fn no_event_is_emitted_without_an_engine() {
    let runner = Arc::new(FakeRunner::happy());
    let sink = Arc::new(RecordingSink::default());
    let cfg = ExperimentConfig {
        engine: None,
        ..config(5)
    };

    let _ = controller(cfg, &runner, &sink)
        .run(std::future::pending())
        .await;

    assert!(sink.events.lock().unwrap().is_empty());
}
