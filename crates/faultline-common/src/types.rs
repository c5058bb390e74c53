//! Domain primitive types used across the faultline workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FaultlineError, Result};

/// Container runtime kinds whose inspection output we know how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerRuntime {
    /// containerd: the init PID lives under `info.pid` in the inspect output.
    Containerd,
    /// CRI-O: the init PID is a top-level `pid` field in the inspect output.
    Crio,
}

impl ContainerRuntime {
    /// Returns the lowercase name used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Containerd => "containerd",
            Self::Crio => "crio",
        }
    }
}

impl FromStr for ContainerRuntime {
    type Err = FaultlineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "containerd" => Ok(Self::Containerd),
            "crio" => Ok(Self::Crio),
            other => Err(FaultlineError::UnsupportedRuntime {
                runtime: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ContainerRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bare identifier of a container, with any runtime scheme prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a container ID from an already-bare identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a container ID from a fully-qualified `<scheme>://<id>`
    /// identifier, stripping the scheme prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier has no scheme prefix or the
    /// identifier part is empty.
    pub fn from_qualified(qualified: &str) -> Result<Self> {
        match qualified.split_once("://") {
            Some((_, id)) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => Err(FaultlineError::Config {
                message: format!("container id is not of the form <scheme>://<id>: {qualified}"),
            }),
        }
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PID of the target container's init process, owning its network namespace.
///
/// PID 0 is never valid: inspection tooling decodes an absent field to zero,
/// so zero means "no running container" rather than a usable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetPid(u32);

impl TargetPid {
    /// Wraps a raw PID, rejecting the invalid value 0.
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Returns the raw PID value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TargetPid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque `tc netem` parameter string, passed to the kernel tool verbatim.
///
/// Validity of the parameters is the kernel tool's concern, not ours; the
/// only requirement is that the string is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultSpec(String);

impl FaultSpec {
    /// Wraps a netem parameter string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or whitespace-only.
    pub fn new(spec: impl Into<String>) -> Result<Self> {
        let spec = spec.into();
        if spec.trim().is_empty() {
            return Err(FaultlineError::Config {
                message: "fault specification must not be empty".into(),
            });
        }
        Ok(Self(spec))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FaultSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable identity of the fault target, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    /// Namespace the target pod lives in.
    pub namespace: String,
    /// Name of the target pod.
    pub pod: String,
    /// Name of the target container inside the pod.
    pub container: String,
    /// Container runtime the target runs under.
    pub runtime: ContainerRuntime,
    /// Network interface the discipline is applied to.
    pub interface: String,
}

/// Whether a discipline has been installed during this run.
///
/// Drives cleanup idempotency: removal is attempted once per run and must be
/// safe to invoke while still `NotInjected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionState {
    /// No discipline has been installed yet.
    NotInjected,
    /// The kernel accepted the discipline.
    Injected,
}

impl fmt::Display for InjectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInjected => write!(f, "not-injected"),
            Self::Injected => write!(f, "injected"),
        }
    }
}

/// Terminal result of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// The duration elapsed and the discipline was removed.
    CompletedNormally,
    /// A termination signal cut the wait short; cleanup still ran.
    TerminatedBySignal,
    /// Resolution or injection failed before the wait began.
    FailedDuringInjection,
    /// The wait completed but removing the discipline failed.
    FailedDuringCleanup,
}

impl LifecycleOutcome {
    /// Returns the process exit status for this outcome.
    ///
    /// Signal-interrupted runs exit nonzero so orchestration layers can
    /// distinguish them from a completed experiment.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::CompletedNormally => 0,
            Self::TerminatedBySignal | Self::FailedDuringInjection | Self::FailedDuringCleanup => 1,
        }
    }

    /// Returns true only for a normally-completed run.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::CompletedNormally)
    }
}

impl fmt::Display for LifecycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompletedNormally => write!(f, "completed-normally"),
            Self::TerminatedBySignal => write!(f, "terminated-by-signal"),
            Self::FailedDuringInjection => write!(f, "failed-during-injection"),
            Self::FailedDuringCleanup => write!(f, "failed-during-cleanup"),
        }
    }
}
