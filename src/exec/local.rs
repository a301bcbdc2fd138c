// src/exec/local.rs

//! Local-process executor.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::dispatch::{JobExecutor, JobFuture};
use crate::errors::{JobError, MultiError, Result};
use crate::exec::output::{copy_raw, Streams};
use crate::template::format_all;
use crate::types::Job;

/// Runs one local process per job.
///
/// Every argv entry is a template, formatted independently per job.
#[derive(Debug, Clone)]
pub struct LocalExecutor {
    argv: Vec<String>,
    quiet: bool,
    streams: Streams,
}

impl LocalExecutor {
    pub fn new(argv: Vec<String>, quiet: bool, streams: Streams) -> Result<Self> {
        if argv.is_empty() {
            return Err(MultiError::MissingCommand);
        }
        Ok(Self {
            argv,
            quiet,
            streams,
        })
    }

    async fn run_job(&self, job: Job) -> std::result::Result<(), JobError> {
        let argv = format_all(&self.argv, job.thread_id, &job.item);
        let command = argv.join(" ");
        let Some((program, args)) = argv.split_first() else {
            return Err(JobError::Spawn {
                command,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argv"),
            });
        };

        debug!(thread_id = job.thread_id, command = %command, "starting process");

        let (out_cfg, err_cfg) = if self.quiet {
            (Stdio::null(), Stdio::null())
        } else {
            (Stdio::piped(), Stdio::piped())
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(out_cfg)
            .stderr(err_cfg)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| JobError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let copy_out = async {
            match stdout {
                Some(r) => copy_raw(r, &self.streams.stdout).await.map(|_| ()),
                None => Ok(()),
            }
        };
        let copy_err = async {
            match stderr {
                Some(r) => copy_raw(r, &self.streams.stderr).await.map(|_| ()),
                None => Ok(()),
            }
        };

        let (out_res, err_res, status) = tokio::join!(copy_out, copy_err, child.wait());

        let status = status.map_err(|source| JobError::Spawn {
            command: command.clone(),
            source,
        })?;

        debug!(
            thread_id = job.thread_id,
            exit_code = status.code().unwrap_or(-1),
            success = status.success(),
            "process exited"
        );

        if !status.success() {
            return Err(JobError::Exit { command, status });
        }

        out_res
            .and(err_res)
            .map_err(|source| JobError::Output { command, source })
    }
}

impl JobExecutor for LocalExecutor {
    fn execute(&self, job: Job) -> JobFuture<'_> {
        Box::pin(self.run_job(job))
    }
}
