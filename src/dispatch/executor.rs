// src/dispatch/executor.rs

use std::future::Future;
use std::pin::Pin;

use crate::errors::JobError;
use crate::types::Job;

/// Future returned by a [`JobExecutor`].
pub type JobFuture<'a> = Pin<Box<dyn Future<Output = Result<(), JobError>> + Send + 'a>>;

/// Runs a single job against some target.
///
/// Production code uses the local-process and remote-session executors in
/// [`crate::exec`]; tests can pass any closure through [`executor_fn`].
pub trait JobExecutor: Send + Sync + 'static {
    fn execute(&self, job: Job) -> JobFuture<'_>;
}

/// Adapter turning `Fn(Job) -> impl Future` into a [`JobExecutor`].
pub struct FnExecutor<F> {
    f: F,
}

pub fn executor_fn<F, Fut>(f: F) -> FnExecutor<F>
where
    F: Fn(Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    FnExecutor { f }
}

impl<F, Fut> JobExecutor for FnExecutor<F>
where
    F: Fn(Job) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    fn execute(&self, job: Job) -> JobFuture<'_> {
        Box::pin((self.f)(job))
    }
}
