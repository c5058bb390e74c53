//! Experiment lifecycle event emission.
//!
//! The controller notifies an external event sink when chaos injection
//! begins. Emission is best-effort: a sink failure is logged and never
//! aborts the run.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use faultline_common::error::{FaultlineError, Result};

/// One lifecycle notification.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentEvent {
    /// Experiment name this event belongs to.
    pub experiment: String,
    /// Machine-readable reason, e.g. `ChaosInject`.
    pub reason: String,
    /// Human-readable message.
    pub message: String,
    /// Unique identifier of the experiment run, if known.
    pub uid: Option<String>,
    /// When the event was recorded.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ExperimentEvent {
    /// Builds the injection-start event for an experiment.
    #[must_use]
    pub fn inject_started(experiment: &str, uid: Option<String>, pod: &str) -> Self {
        Self {
            experiment: experiment.to_string(),
            reason: faultline_common::constants::EVENT_REASON_INJECT.to_string(),
            message: format!("Injecting {experiment} chaos on application pod {pod}"),
            uid,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Accepts lifecycle notifications from the controller.
pub trait EventSink: Send + Sync {
    /// Records one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot persist the event. Callers treat
    /// this as non-fatal.
    fn record(&self, event: &ExperimentEvent) -> Result<()>;
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn record(&self, event: &ExperimentEvent) -> Result<()> {
        (**self).record(event)
    }
}

/// Sink that emits events as structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn record(&self, event: &ExperimentEvent) -> Result<()> {
        tracing::info!(
            experiment = %event.experiment,
            reason = %event.reason,
            uid = ?event.uid,
            "{}",
            event.message
        );
        Ok(())
    }
}

/// Sink that appends one JSON line per event to a file.
///
/// Intended for harnesses that scrape a shared volume; the parent directory
/// is created on first write.
#[derive(Debug, Clone)]
pub struct FileEventSink {
    path: PathBuf,
}

impl FileEventSink {
    /// Creates a sink writing to the given file.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl EventSink for FileEventSink {
    fn record(&self, event: &ExperimentEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FaultlineError::Io {
                context: format!("creating event directory {}", parent.display()),
                source: e,
            })?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| FaultlineError::Io {
                context: format!("opening event file {}", self.path.display()),
                source: e,
            })?;
        let line = serde_json::to_string(event)?;
        writeln!(file, "{line}").map_err(|e| FaultlineError::Io {
            context: format!("writing event file {}", self.path.display()),
            source: e,
        })?;
        Ok(())
    }
}
