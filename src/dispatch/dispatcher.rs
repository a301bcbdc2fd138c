// src/dispatch/dispatcher.rs

use std::any::Any;
use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use crate::dispatch::executor::JobExecutor;
use crate::dispatch::spawner::{Spawner, Unbounded};
use crate::errors::JobError;
use crate::types::JobSet;

/// Runs every job of a [`JobSet`] concurrently and collects failures.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher<S = Unbounded> {
    spawner: S,
}

impl Dispatcher<Unbounded> {
    pub fn new() -> Self {
        Self { spawner: Unbounded }
    }
}

impl<S: Spawner> Dispatcher<S> {
    pub fn with_spawner(spawner: S) -> Self {
        Self { spawner }
    }

    /// Spawn one unit per job, wait for all of them, and return the errors.
    ///
    /// The returned list has one entry per failed job, in no particular
    /// order. A job that panics or is aborted by the runtime still yields an
    /// error entry.
    pub async fn run_all<E: JobExecutor>(&self, jobs: JobSet, executor: Arc<E>) -> Vec<JobError> {
        let total = jobs.len();
        debug!(jobs = total, "dispatching jobs");

        let (thread_ids, handles): (Vec<usize>, Vec<_>) = jobs
            .into_iter()
            .map(|job| {
                let thread_id = job.thread_id;
                let exec = Arc::clone(&executor);
                let handle = self
                    .spawner
                    .spawn(Box::pin(async move { exec.execute(job).await }));
                (thread_id, handle)
            })
            .unzip();

        let results = join_all(handles).await;

        let errors: Vec<JobError> = thread_ids
            .into_iter()
            .zip(results)
            .filter_map(|(thread_id, joined)| match joined {
                Ok(Ok(())) => None,
                Ok(Err(err)) => {
                    warn!(thread_id, error = %err, "job failed");
                    Some(err)
                }
                Err(join_err) => Some(join_error_to_job_error(thread_id, join_err)),
            })
            .collect();

        info!(jobs = total, failed = errors.len(), "all jobs finished");
        errors
    }
}

fn join_error_to_job_error(thread_id: usize, err: JoinError) -> JobError {
    if err.is_panic() {
        let message = panic_message(err.into_panic());
        warn!(thread_id, %message, "job panicked");
        JobError::Panicked { thread_id, message }
    } else {
        warn!(thread_id, "job cancelled");
        JobError::Cancelled { thread_id }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
