//! Container-runtime inspection for the faultline workspace.
//!
//! Resolves a container identifier to the PID of its init process — the
//! process owning the container's network namespace — by invoking the CRI
//! inspection tool and parsing its runtime-dependent JSON shape.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod inspect;
pub mod parse;

pub use inspect::resolve_pid;
