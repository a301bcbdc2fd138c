// src/dispatch/spawner.rs

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::errors::JobError;

/// Turns one job's future into one concurrent unit of execution.
///
/// The dispatcher only relies on the returned handle resolving once the
/// job is done, so a bounded variant can be dropped in here without
/// touching [`Dispatcher::run_all`](super::Dispatcher::run_all).
pub trait Spawner: Send + Sync {
    fn spawn(&self, job: BoxFuture<'static, Result<(), JobError>>) -> JoinHandle<Result<(), JobError>>;
}

/// One tokio task per job, started immediately. No pool, no queue: the job
/// count is the concurrency level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Spawner for Unbounded {
    fn spawn(&self, job: BoxFuture<'static, Result<(), JobError>>) -> JoinHandle<Result<(), JobError>> {
        tokio::spawn(job)
    }
}
