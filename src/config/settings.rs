// src/config/settings.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::{CommonArgs, SshArgs};
use crate::config::model::ConfigFile;
use crate::errors::{MultiError, Result};

/// Effective ssh settings for a run: CLI flags over config file values.
#[derive(Debug, Clone)]
pub struct SshSettings {
    pub username: String,
    pub password: Option<String>,
    pub identity: Option<PathBuf>,
    pub no_agent: bool,
    pub no_prefix: bool,
    pub timeout: Duration,
}

impl SshSettings {
    /// `env_user` is the value of `$USER`, used when no username is given.
    pub fn resolve(args: &SshArgs, cfg: &ConfigFile, env_user: Option<String>) -> Result<Self> {
        let username = args
            .username
            .clone()
            .or_else(|| cfg.ssh.username.clone())
            .or(env_user.filter(|u| !u.is_empty()))
            .ok_or_else(|| {
                MultiError::ConfigError(
                    "no username given: pass --username, set [ssh].username, or set $USER"
                        .to_string(),
                )
            })?;

        Ok(Self {
            username,
            password: args.password.clone().filter(|p| !p.is_empty()),
            identity: args.identity.clone().or_else(|| cfg.ssh.identity.clone()),
            no_agent: args.no_agent || cfg.ssh.no_agent,
            no_prefix: args.no_prefix || cfg.ssh.no_prefix,
            timeout: args.timeout.unwrap_or(cfg.ssh.timeout),
        })
    }
}

/// Output is suppressed when either `--quiet` or `[output].quiet` says so.
pub fn resolve_quiet(common: &CommonArgs, cfg: &ConfigFile) -> bool {
    common.quiet || cfg.output.quiet
}
