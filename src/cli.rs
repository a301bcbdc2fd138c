// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::parse_duration;

const ABOUT_LONG: &str = "\
multi is a small tool for making many ssh connections or local executions at once.

Each argument of the command may contain these tokens:

  %t - the thread id (a unique index for each job)
  %i - the item when --input is enabled: one line from standard input
  %% - a literal percent sign

Thread ids are not stable: the same item may get a different id on the next run.

If both --count and --input are given, the larger wins; jobs beyond the end of the
input get an empty item.

In ssh mode, --count is the number of jobs per host, so count x hosts jobs run in
total.

There is no concurrency limit: every job starts at once.";

/// Command-line arguments for `multi`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "multi",
    version,
    about = "Execute many commands in parallel",
    long_about = ABOUT_LONG
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MULTI_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Path to an optional TOML config file.
    ///
    /// If omitted, `MULTI_CONFIG` is consulted; without either, built-in
    /// defaults apply.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Execute a local command in parallel.
    #[command(visible_alias = "e", override_usage = "multi exec [OPTIONS] -- <COMMAND>...")]
    Exec(ExecArgs),

    /// Execute a command in parallel over ssh.
    ///
    /// The host list file is a newline-delimited list of host or host:port
    /// entries (22 is the default port).
    #[command(
        visible_alias = "s",
        override_usage = "multi ssh [OPTIONS] -- <HOST_LIST_FILE> <COMMAND>..."
    )]
    Ssh(SshArgs),
}

/// Flags shared by both modes.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Do not display output from commands.
    #[arg(short, long)]
    pub quiet: bool,

    /// Read standard input as a list of items, one per line.
    ///
    /// The whole input is read before any job starts.
    #[arg(short, long)]
    pub input: bool,

    /// Number of jobs (exec) or jobs per host (ssh); with --input the larger
    /// of this and the number of lines is used in exec mode.
    #[arg(short, long, value_name = "N")]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct ExecArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Command and arguments, after `--`.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SshArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Timeout for establishing ssh connections (e.g. 30s, 1m).
    #[arg(short, long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Username to connect as (default: config file, then $USER).
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password to connect with, if any.
    #[arg(short, long)]
    pub password: Option<String>,

    /// Identity (private key) file to connect with.
    #[arg(short = 'd', long, value_name = "PATH")]
    pub identity: Option<PathBuf>,

    /// Do not attempt to use an ssh-agent.
    #[arg(short, long)]
    pub no_agent: bool,

    /// Do not prefix output lines with the host.
    #[arg(short = 'r', long)]
    pub no_prefix: bool,

    /// Host list file followed by the command and its arguments, after `--`.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ARGS"
    )]
    pub args: Vec<String>,
}

impl SshArgs {
    pub fn host_list_file(&self) -> Option<PathBuf> {
        self.args.first().map(PathBuf::from)
    }

    pub fn command(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
