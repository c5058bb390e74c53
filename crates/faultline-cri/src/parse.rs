//! Runtime-keyed parsing of `crictl inspect` output.
//!
//! The location of the init PID depends on the runtime: containerd nests it
//! under `info.pid`, CRI-O exposes a top-level `pid`. The knowledge of
//! "where is the PID in this JSON" lives here, keyed exhaustively by
//! [`ContainerRuntime`].
//!
//! PID fields default to 0 when absent, and 0 is then rejected as "no
//! running container": an inspect document without the field and a stopped
//! container report the same way.

use serde::Deserialize;

use faultline_common::error::{FaultlineError, Result};
use faultline_common::types::{ContainerId, ContainerRuntime, TargetPid};

#[derive(Debug, Default, Deserialize)]
struct ContainerdInspect {
    #[serde(default)]
    info: ContainerdInfo,
}

#[derive(Debug, Default, Deserialize)]
struct ContainerdInfo {
    #[serde(default)]
    pid: u32,
}

#[derive(Debug, Default, Deserialize)]
struct CrioInspect {
    #[serde(default)]
    pid: u32,
}

/// Extracts the init PID from an inspect document.
///
/// # Errors
///
/// Returns a resolution error if the document is not valid JSON or the
/// resolved PID is 0 (no running container).
pub fn parse_pid(
    raw: &str,
    runtime: ContainerRuntime,
    container_id: &ContainerId,
) -> Result<TargetPid> {
    let resolution_error = |message: String| FaultlineError::Resolution {
        container_id: container_id.to_string(),
        message,
        output: raw.to_string(),
    };

    let pid = match runtime {
        ContainerRuntime::Containerd => {
            let doc: ContainerdInspect = serde_json::from_str(raw)
                .map_err(|e| resolution_error(format!("could not parse inspect output: {e}")))?;
            doc.info.pid
        }
        ContainerRuntime::Crio => {
            let doc: CrioInspect = serde_json::from_str(raw)
                .map_err(|e| resolution_error(format!("could not parse inspect output: {e}")))?;
            doc.pid
        }
    };

    TargetPid::new(pid)
        .ok_or_else(|| resolution_error("no running target container found".to_string()))
}
