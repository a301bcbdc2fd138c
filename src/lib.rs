// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod hosts;
pub mod input;
pub mod logging;
pub mod template;
pub mod types;

use std::sync::Arc;

use tracing::debug;

use crate::cli::{CliArgs, Command, ExecArgs, SshArgs};
use crate::config::loader::CONFIG_ENV;
use crate::config::{load_optional, resolve_config_path, resolve_quiet, ConfigFile, SshSettings};
use crate::engine::{report_errors, run_local, run_remote, LocalRun, RemoteRun};
use crate::errors::{JobError, MultiError, Result};
use crate::exec::ssh::agent_socket_from_env;
use crate::exec::{RemoteOptions, SshAuth, SshShell, Streams};
use crate::fs::{FileSystem, RealFileSystem};
use crate::hosts::HostList;
use crate::input::read_lines;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - host list and standard input reading
/// - credential preparation (ssh mode)
/// - the dispatcher and the matching executor
/// - error reporting
pub async fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let config_path = resolve_config_path(args.config.clone(), std::env::var_os(CONFIG_ENV));
    let cfg = load_optional(&fs, config_path.as_deref())?;
    debug!(config = ?config_path, "configuration loaded");

    let streams = Streams::stdio();

    let errors = match args.command {
        Command::Exec(exec) => exec_command(exec, &cfg, streams.clone()).await?,
        Command::Ssh(ssh) => ssh_command(ssh, &cfg, &fs, streams.clone()).await?,
    };

    report_errors(&errors, &streams.stderr).await
}

async fn exec_command(args: ExecArgs, cfg: &ConfigFile, streams: Streams) -> Result<Vec<JobError>> {
    if args.command.is_empty() {
        return Err(MultiError::MissingCommand);
    }

    let input = read_stdin_if(args.common.input).await?;
    let run = LocalRun {
        quiet: resolve_quiet(&args.common, cfg),
        argv: args.command,
        count: args.common.count,
        input,
    };

    run_local(run, streams).await
}

async fn ssh_command(
    args: SshArgs,
    cfg: &ConfigFile,
    fs: &dyn FileSystem,
    streams: Streams,
) -> Result<Vec<JobError>> {
    let host_file = match args.host_list_file() {
        Some(path) if !args.command().is_empty() => path,
        _ => {
            return Err(MultiError::ConfigError(
                "must supply a host list file and command to run".to_string(),
            ));
        }
    };

    let hosts = HostList::load(fs, &host_file)?;
    let input = read_stdin_if(args.common.input).await?;

    let settings = SshSettings::resolve(&args, cfg, std::env::var("USER").ok())?;
    let auth = SshAuth::prepare(&settings, agent_socket_from_env()).await?;
    debug!(user = %auth.username, agent = auth.uses_agent(), "ssh credentials prepared");

    let shell = Arc::new(SshShell::new(Arc::new(auth), settings.timeout));
    let run = RemoteRun {
        hosts,
        args: args.command().to_vec(),
        count: args.common.count,
        input,
        options: RemoteOptions {
            quiet: resolve_quiet(&args.common, cfg),
            prefix: !settings.no_prefix,
        },
    };

    run_remote(run, shell, streams).await
}

async fn read_stdin_if(enabled: bool) -> Result<Option<Vec<String>>> {
    if !enabled {
        return Ok(None);
    }
    let lines = read_lines(tokio::io::stdin()).await?;
    Ok(Some(lines))
}
