//! System-wide constants and defaults.

/// Network interface the discipline is applied to when none is configured.
pub const DEFAULT_INTERFACE: &str = "eth0";

/// Chaos duration in seconds when none is configured.
pub const DEFAULT_CHAOS_DURATION_SECS: u64 = 30;

/// Shell used to execute composed namespace-entry command lines.
pub const SHELL_BIN: &str = "/bin/sh";

/// CRI inspection tool invoked to resolve a container's init PID.
pub const CRICTL_BIN: &str = "crictl";

/// Namespace-entry tool used to reach the target network namespace.
pub const NSENTER_BIN: &str = "nsenter";

/// Kernel traffic-control tool run inside the target namespace.
pub const TC_BIN: &str = "tc";

/// Event reason recorded when chaos injection begins.
pub const EVENT_REASON_INJECT: &str = "ChaosInject";

/// Application name used in logs and event records.
pub const APP_NAME: &str = "faultline";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "fln";
