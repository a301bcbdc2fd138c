// src/engine/mod.rs

//! Run orchestration.
//!
//! [`runtime`] turns a resolved run description ([`LocalRun`] or
//! [`RemoteRun`]) into a job set, hands it to the
//! [`Dispatcher`](crate::dispatch::Dispatcher) together with the matching
//! executor, and reports the collected job errors.

pub mod runtime;

pub use runtime::{report_errors, run_local, run_remote, LocalRun, RemoteRun};
