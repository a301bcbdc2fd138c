// src/exec/remote.rs

//! Remote-session executor.
//!
//! The executor only knows the [`RemoteShell`] capability: "run this command
//! on this host and give me its output and exit status as events". The
//! production implementation is [`SshShell`](crate::exec::ssh::SshShell);
//! tests use a scripted fake.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::dispatch::{JobExecutor, JobFuture};
use crate::errors::JobError;
use crate::exec::output::{StreamWriter, Streams};
use crate::hosts::{HostAddr, HostAssignment};
use crate::template::format;
use crate::types::Job;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stage at which a remote execution failed before producing a status.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("unable to connect: {0}")]
    Connect(#[source] BoxError),

    #[error("authentication failed: {0}")]
    Auth(#[source] BoxError),

    #[error("establishing session: {0}")]
    Session(#[source] BoxError),

    #[error("starting command: {0}")]
    Exec(#[source] BoxError),
}

/// Output and completion of a remote command, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
    Exit(u32),
}

pub type ShellFuture<'a> =
    Pin<Box<dyn Future<Output = Result<mpsc::Receiver<SessionEvent>, ShellError>> + Send + 'a>>;

/// Capability to execute a command on a remote host.
///
/// Once the command has started, the receiver yields its events and closes
/// when the session ends.
pub trait RemoteShell: Send + Sync + 'static {
    fn exec<'a>(&'a self, host: &'a HostAddr, command: &'a str) -> ShellFuture<'a>;
}

/// Output options for remote jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteOptions {
    pub quiet: bool,
    /// Prefix lines with `[host:port] ` when more than one host is in play.
    pub prefix: bool,
}

/// Runs each job's command on its assigned host.
pub struct RemoteExecutor<S> {
    shell: Arc<S>,
    assignment: Arc<HostAssignment>,
    command: String,
    options: RemoteOptions,
    streams: Streams,
}

impl<S: RemoteShell> RemoteExecutor<S> {
    /// `args` are joined with spaces into one command template.
    pub fn new(
        shell: Arc<S>,
        assignment: Arc<HostAssignment>,
        args: &[String],
        options: RemoteOptions,
        streams: Streams,
    ) -> Self {
        Self {
            shell,
            assignment,
            command: args.join(" "),
            options,
            streams,
        }
    }

    fn prefix_enabled(&self) -> bool {
        self.options.prefix && self.assignment.host_count() > 1
    }

    async fn run_job(&self, job: Job) -> Result<(), JobError> {
        let host = self
            .assignment
            .host_for(job.thread_id)
            .ok_or(JobError::NoHost {
                thread_id: job.thread_id,
            })?;
        let command = format(&self.command, job.thread_id, &job.item);
        let host_label = host.to_string();

        debug!(thread_id = job.thread_id, host = %host_label, command = %command, "starting remote command");

        let mut events = self
            .shell
            .exec(host, &command)
            .await
            .map_err(|source| JobError::Remote {
                host: host_label.clone(),
                command: command.clone(),
                source,
            })?;

        let prefix = self.prefix_enabled().then_some(host_label.as_str());
        let mut out = StreamWriter::new(self.streams.stdout.clone(), prefix);
        let mut err = StreamWriter::new(self.streams.stderr.clone(), prefix);

        let mut exit_status = None;
        let mut write_result = Ok(());

        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Exit(status) => exit_status = Some(status),
                _ if self.options.quiet || write_result.is_err() => {}
                SessionEvent::Stdout(data) => write_result = out.write(&data).await,
                SessionEvent::Stderr(data) => write_result = err.write(&data).await,
            }
        }

        if !self.options.quiet && write_result.is_ok() {
            write_result = out.finish().await.and(err.finish().await);
        }

        debug!(thread_id = job.thread_id, host = %host_label, ?exit_status, "remote command finished");

        match exit_status {
            Some(0) => write_result.map_err(|source| JobError::Output { command, source }),
            Some(status) => Err(JobError::RemoteExit {
                host: host_label,
                command,
                status,
            }),
            None => Err(JobError::NoExitStatus {
                host: host_label,
                command,
            }),
        }
    }
}

impl<S: RemoteShell> JobExecutor for RemoteExecutor<S> {
    fn execute(&self, job: Job) -> JobFuture<'_> {
        Box::pin(self.run_job(job))
    }
}
