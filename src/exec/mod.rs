// src/exec/mod.rs

//! Execution targets.
//!
//! - [`local`] runs each job as a local process via `tokio::process`.
//! - [`remote`] runs each job's command on its assigned host through the
//!   [`RemoteShell`] capability.
//! - [`ssh`] is the `russh` implementation of that capability.
//! - [`output`] holds the shared stdout/stderr sinks and copy helpers.

pub mod local;
pub mod output;
pub mod remote;
pub mod ssh;

pub use local::LocalExecutor;
pub use output::{OutputSink, Streams};
pub use remote::{RemoteExecutor, RemoteOptions, RemoteShell, SessionEvent, ShellError};
pub use ssh::{select_agent_socket, AgentIdentities, SshAuth, SshShell};
