//! Lifecycle orchestration for the faultline workspace.
//!
//! Composes the runtime inspector and the netem injector/remover into a
//! single run with all-paths-cleanup semantics: resolve the target PID,
//! install the fault, wait out the chaos duration or a termination signal
//! (whichever comes first), and unconditionally remove the fault before
//! returning.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod controller;
pub mod events;
pub mod resolve;
pub mod signal;

pub use controller::{LifecycleController, RunReport};
