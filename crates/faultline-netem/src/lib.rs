//! Traffic-control fault installation and removal for the faultline
//! workspace.
//!
//! Enters the network namespace of a target PID with `nsenter` and drives
//! `tc` to add or delete a `netem` queueing discipline on one interface.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod qdisc;

pub use qdisc::NetemHandle;
