// src/errors.rs

//! Crate-wide error types.
//!
//! - [`MultiError`] covers configuration problems. These are fatal and are
//!   raised before any job is dispatched.
//! - [`JobError`] covers a single job failing. These are collected by the
//!   dispatcher and never abort sibling jobs.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::exec::remote::ShellError;

#[derive(Error, Debug)]
pub enum MultiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("must supply a command to run")]
    MissingCommand,

    #[error("could not open host list file {path:?}: {source}")]
    HostList {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("host list file {0:?} contains no hosts")]
    NoHosts(PathBuf),

    #[error("invalid host entry '{entry}': {reason}")]
    InvalidHost { entry: String, reason: String },

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("reading input: {0}")]
    Input(#[source] std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("some commands had errors ({0} failed)")]
    JobsFailed(usize),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of one job. Every message names the command, and the host for
/// remote jobs, so a reader can tell which target failed.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("while running {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("while running {command}: {status}")]
    Exit { command: String, status: ExitStatus },

    #[error("streaming output of {command}: {source}")]
    Output {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no host assigned to job {thread_id}")]
    NoHost { thread_id: usize },

    #[error("executing {command} on {host}: {source}")]
    Remote {
        host: String,
        command: String,
        #[source]
        source: ShellError,
    },

    #[error("executing {command} on {host}: exited with status {status}")]
    RemoteExit {
        host: String,
        command: String,
        status: u32,
    },

    #[error("executing {command} on {host}: session closed without an exit status")]
    NoExitStatus { host: String, command: String },

    #[error("job {thread_id} panicked: {message}")]
    Panicked { thread_id: usize, message: String },

    #[error("job {thread_id} was cancelled before completing")]
    Cancelled { thread_id: usize },
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MultiError>;
