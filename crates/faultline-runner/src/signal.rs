//! Termination-signal listening as a first-class awaited event.
//!
//! The controller races the chaos-duration timer against whatever future
//! the caller supplies; this module builds the production future from the
//! process termination signals. Registration happens eagerly so a handler
//! setup failure surfaces at startup, not mid-wait.

use std::future::Future;
use std::pin::Pin;

use faultline_common::error::Result;

/// Returns a future that resolves when SIGTERM or SIGINT is delivered.
///
/// # Errors
///
/// Returns an error if the signal handlers cannot be registered.
#[cfg(unix)]
pub fn termination_signal() -> Result<Pin<Box<dyn Future<Output = ()> + Send>>> {
    use faultline_common::error::FaultlineError;
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate()).map_err(|e| FaultlineError::Io {
        context: "registering SIGTERM handler".into(),
        source: e,
    })?;
    let mut sigint = signal(SignalKind::interrupt()).map_err(|e| FaultlineError::Io {
        context: "registering SIGINT handler".into(),
        source: e,
    })?;

    Ok(Box::pin(async move {
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM"),
            _ = sigint.recv() => tracing::info!("received SIGINT"),
        }
    }))
}

/// Returns a future that resolves when SIGTERM or SIGINT is delivered.
///
/// # Errors
///
/// Always returns an error on non-Unix platforms: the namespace tooling
/// this agent drives is Linux-only.
#[cfg(not(unix))]
pub fn termination_signal() -> Result<Pin<Box<dyn Future<Output = ()> + Send>>> {
    Err(faultline_common::error::FaultlineError::Config {
        message: "termination signals require a Unix platform".into(),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn resolves_on_sigterm() {
        let shutdown = termination_signal().expect("handlers should register");
        nix::sys::signal::raise(nix::sys::signal::Signal::SIGTERM).expect("raise SIGTERM");
        tokio::time::timeout(Duration::from_secs(5), shutdown)
            .await
            .expect("future should resolve after SIGTERM");
    }
}
