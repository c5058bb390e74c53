//! Unified error types for the faultline workspace.
//!
//! External-tool failures carry the tool's raw combined output: kernel and
//! runtime tool errors are frequently only legible in free-text stderr, so
//! the text is preserved end to end instead of being summarized away.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum FaultlineError {
    /// The target container or its PID could not be determined.
    ///
    /// Fatal with no cleanup: nothing was mutated yet.
    #[error("failed to resolve container {container_id}: {message}: {output}")]
    Resolution {
        /// Identifier of the container that could not be resolved.
        container_id: String,
        /// Description of what went wrong.
        message: String,
        /// Raw combined output of the inspection tool.
        output: String,
    },

    /// The configured container runtime kind is not recognized.
    #[error("unsupported container runtime: {runtime}")]
    UnsupportedRuntime {
        /// The unrecognized runtime kind.
        runtime: String,
    },

    /// Installing the traffic-control discipline failed.
    ///
    /// Cleanup is still attempted defensively after this error.
    #[error("fault injection failed running `{command}`: {output}")]
    Injection {
        /// The full command text, for manual reproduction.
        command: String,
        /// Raw combined output of the kernel tool.
        output: String,
    },

    /// Removing the traffic-control discipline failed.
    #[error("fault removal failed running `{command}`: {output}")]
    Cleanup {
        /// The full command text, for manual reproduction.
        command: String,
        /// Raw combined output of the kernel tool.
        output: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error while {context}: {source}")]
    Io {
        /// What was being attempted when the error occurred.
        context: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FaultlineError>;
