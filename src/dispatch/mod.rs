// src/dispatch/mod.rs

//! Fan-out / fan-in of jobs.
//!
//! - [`executor`] defines the [`JobExecutor`] seam every execution target
//!   implements, plus [`executor_fn`] for plain closures.
//! - [`spawner`] defines how one job becomes one concurrent unit.
//! - [`dispatcher`] runs a whole [`JobSet`](crate::types::JobSet) and
//!   collects the errors.

pub mod dispatcher;
pub mod executor;
pub mod spawner;

pub use dispatcher::Dispatcher;
pub use executor::{executor_fn, FnExecutor, JobExecutor, JobFuture};
pub use spawner::{Spawner, Unbounded};
