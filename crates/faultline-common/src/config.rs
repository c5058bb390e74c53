//! Experiment configuration model.
//!
//! All values are supplied externally (flags or environment); the core
//! treats them as opaque strings and numbers. Parsing into domain types
//! happens at the start of a run, inside the resolution phase.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FaultlineError, Result};

/// Full configuration surface for one chaos run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Experiment name, used in logs and event records.
    pub experiment: String,
    /// Experiment-engine name. Empty disables event emission.
    pub engine: Option<String>,
    /// Unique identifier of this experiment run.
    pub uid: Option<String>,
    /// Namespace of the target pod.
    pub namespace: String,
    /// Name of the target pod.
    pub pod: String,
    /// Name of the target container inside the pod.
    pub container: String,
    /// Fully-qualified container id, `<scheme>://<id>`.
    pub container_id: String,
    /// Container runtime kind (`containerd` or `crio`).
    pub runtime: String,
    /// Network interface the discipline is applied to.
    pub interface: String,
    /// Total chaos duration in seconds.
    pub duration_secs: u64,
    /// Verbatim `tc netem` parameter string.
    pub fault: String,
}

impl ExperimentConfig {
    /// Returns the chaos duration as a [`Duration`].
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// Checks the fields the core cannot proceed without.
    ///
    /// Runtime kind and container id format are validated later, during
    /// the resolution phase, where their failures belong.
    ///
    /// # Errors
    ///
    /// Returns an error if the container id or fault specification is empty.
    pub fn validate(&self) -> Result<()> {
        if self.container_id.trim().is_empty() {
            return Err(FaultlineError::Config {
                message: "target container id must be supplied".into(),
            });
        }
        if self.fault.trim().is_empty() {
            return Err(FaultlineError::Config {
                message: "fault specification must be supplied".into(),
            });
        }
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiment: String::new(),
            engine: None,
            uid: None,
            namespace: String::new(),
            pod: String::new(),
            container: String::new(),
            container_id: String::new(),
            runtime: String::new(),
            interface: crate::constants::DEFAULT_INTERFACE.to_string(),
            duration_secs: crate::constants::DEFAULT_CHAOS_DURATION_SECS,
            fault: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> ExperimentConfig {
        ExperimentConfig {
            container_id: "containerd://3f9a0c".into(),
            fault: "loss 50".into(),
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn defaults_match_spec() {
        let config = ExperimentConfig::default();
        assert_eq!(config.interface, "eth0");
        assert_eq!(config.duration(), Duration::from_secs(30));
    }

    #[test]
    fn validate_accepts_populated_config() {
        assert!(populated().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_container_id() {
        let config = ExperimentConfig {
            container_id: String::new(),
            ..populated()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_fault() {
        let config = ExperimentConfig {
            fault: "  ".into(),
            ..populated()
        };
        assert!(config.validate().is_err());
    }
}
