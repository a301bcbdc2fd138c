// src/engine/runtime.rs

use std::sync::Arc;

use tracing::info;

use crate::dispatch::Dispatcher;
use crate::errors::{JobError, MultiError, Result};
use crate::exec::output::{OutputSink, Streams};
use crate::exec::{LocalExecutor, RemoteExecutor, RemoteOptions, RemoteShell};
use crate::hosts::{reconcile_remote, HostList};
use crate::input::reconcile;

/// A fully resolved local run.
#[derive(Debug, Clone, Default)]
pub struct LocalRun {
    /// Program and arguments; every entry is a template.
    pub argv: Vec<String>,
    pub count: Option<usize>,
    /// Input lines, present only in input mode.
    pub input: Option<Vec<String>>,
    pub quiet: bool,
}

/// A fully resolved remote run.
#[derive(Debug, Clone, Default)]
pub struct RemoteRun {
    pub hosts: HostList,
    /// Command words; joined with spaces into one template.
    pub args: Vec<String>,
    /// Jobs per host.
    pub count: Option<usize>,
    pub input: Option<Vec<String>>,
    pub options: RemoteOptions,
}

/// Run every local job and return the failures.
///
/// Configuration errors (no command) are returned before anything starts.
pub async fn run_local(run: LocalRun, streams: Streams) -> Result<Vec<JobError>> {
    let executor = Arc::new(LocalExecutor::new(run.argv, run.quiet, streams)?);
    let jobs = reconcile(run.count, run.input);

    info!(jobs = jobs.len(), "starting local run");
    Ok(Dispatcher::new().run_all(jobs, executor).await)
}

/// Run every remote job through `shell` and return the failures.
pub async fn run_remote<S: RemoteShell>(
    run: RemoteRun,
    shell: Arc<S>,
    streams: Streams,
) -> Result<Vec<JobError>> {
    if run.args.is_empty() {
        return Err(MultiError::MissingCommand);
    }

    let (jobs, assignment) = reconcile_remote(run.count, run.input, run.hosts)?;
    info!(
        jobs = jobs.len(),
        hosts = assignment.host_count(),
        per_host = assignment.per_host(),
        "starting remote run"
    );

    let executor = Arc::new(RemoteExecutor::new(
        shell,
        Arc::new(assignment),
        &run.args,
        run.options,
        streams,
    ));
    Ok(Dispatcher::new().run_all(jobs, executor).await)
}

/// Print every job error on its own line, then signal aggregate failure.
pub async fn report_errors(errors: &[JobError], sink: &OutputSink) -> Result<()> {
    for err in errors {
        sink.write_all(format!("{err}\n").as_bytes()).await?;
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(MultiError::JobsFailed(errors.len()))
    }
}
