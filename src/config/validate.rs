// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile, SshDefaults, SshSection, DEFAULT_CONNECT_TIMEOUT};
use crate::errors::{MultiError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = MultiError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        Ok(ConfigFile {
            ssh: validate_ssh_section(raw.ssh)?,
            output: raw.output,
        })
    }
}

fn validate_ssh_section(ssh: SshSection) -> Result<SshDefaults> {
    if let Some(username) = &ssh.username {
        if username.trim().is_empty() {
            return Err(MultiError::ConfigError(
                "[ssh].username must not be empty".to_string(),
            ));
        }
    }

    let timeout = match ssh.timeout.as_deref() {
        Some(s) => parse_duration(s)
            .map_err(|e| MultiError::ConfigError(format!("[ssh].timeout: {e}")))?,
        None => DEFAULT_CONNECT_TIMEOUT,
    };

    Ok(SshDefaults {
        username: ssh.username,
        timeout,
        identity: ssh.identity,
        no_agent: ssh.no_agent,
        no_prefix: ssh.no_prefix,
    })
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
///
/// Zero durations are rejected: a zero connect timeout would fail every job.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    if value == 0 {
        return Err("duration must be greater than zero".to_string());
    }
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
