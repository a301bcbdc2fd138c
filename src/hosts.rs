// src/hosts.rs

//! Host list parsing and job-to-host assignment for ssh mode.
//!
//! Jobs are grouped contiguously by host: with `per_host = 2` and hosts
//! `[h1, h2]`, jobs 0 and 1 run on `h1`, jobs 2 and 3 on `h2`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{MultiError, Result};
use crate::fs::FileSystem;
use crate::input::{effective_count, split_lines};
use crate::types::JobSet;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// A remote endpoint, always carrying an explicit port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostAddr {
    pub host: String,
    pub port: u16,
}

impl HostAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for HostAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for HostAddr {
    type Err = MultiError;

    /// Accepts `host`, `host:port`, `[v6addr]` and `[v6addr]:port`. An
    /// unbracketed entry with more than one colon is an IPv6 address without
    /// a port.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let entry = s.trim();
        let invalid = |reason: &str| MultiError::InvalidHost {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        if entry.is_empty() {
            return Err(invalid("empty host"));
        }

        let (host, port) = if let Some(rest) = entry.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| invalid("missing closing ']'"))?;
            match after {
                "" => (host, None),
                _ => {
                    let port = after
                        .strip_prefix(':')
                        .ok_or_else(|| invalid("expected ':' after ']'"))?;
                    (host, Some(port))
                }
            }
        } else if entry.matches(':').count() > 1 {
            (entry, None)
        } else {
            match entry.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (entry, None),
            }
        };

        if host.is_empty() {
            return Err(invalid("empty host"));
        }

        let port = match port {
            None => DEFAULT_SSH_PORT,
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| invalid(&format!("bad port '{p}': {e}")))?,
        };

        Ok(HostAddr::new(host, port))
    }
}

/// Ordered host list, immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostList {
    hosts: Vec<HostAddr>,
}

impl HostList {
    pub fn new(hosts: Vec<HostAddr>) -> Self {
        Self { hosts }
    }

    /// Parse newline-delimited host entries; blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let hosts = split_lines(text)
            .iter()
            .filter(|l| !l.is_empty())
            .map(|l| l.parse::<HostAddr>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { hosts })
    }

    /// Read and parse a host list file. An empty list is a configuration
    /// error.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let text = fs
            .read_to_string(path)
            .map_err(|source| MultiError::HostList {
                path: path.to_path_buf(),
                source,
            })?;
        let list = Self::parse(&text)?;
        if list.is_empty() {
            return Err(MultiError::NoHosts(path.to_path_buf()));
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&HostAddr> {
        self.hosts.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostAddr> {
        self.hosts.iter()
    }
}

/// Maps job indices onto hosts, `per_host` consecutive jobs per host.
#[derive(Debug, Clone)]
pub struct HostAssignment {
    hosts: HostList,
    per_host: usize,
}

impl HostAssignment {
    pub fn new(hosts: HostList, per_host: usize) -> Result<Self> {
        if hosts.is_empty() {
            return Err(MultiError::ConfigError(
                "host list must contain at least one host".to_string(),
            ));
        }
        if per_host == 0 {
            return Err(MultiError::ConfigError(
                "jobs per host must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(Self { hosts, per_host })
    }

    pub fn job_count(&self) -> usize {
        self.per_host * self.hosts.len()
    }

    pub fn per_host(&self) -> usize {
        self.per_host
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    pub fn hosts(&self) -> &HostList {
        &self.hosts
    }

    /// Host for job `thread_id`, or `None` past the end of the run.
    pub fn host_for(&self, thread_id: usize) -> Option<&HostAddr> {
        self.hosts.get(thread_id / self.per_host)
    }
}

/// Build the job set for an ssh run: exactly `count_or_1 * hosts` jobs.
///
/// Input lines fill items by index; having more lines than jobs is a
/// configuration error, since the extra lines would never run.
pub fn reconcile_remote(
    count: Option<usize>,
    lines: Option<Vec<String>>,
    hosts: HostList,
) -> Result<(JobSet, HostAssignment)> {
    let assignment = HostAssignment::new(hosts, effective_count(count))?;
    let total = assignment.job_count();
    let lines = lines.unwrap_or_default();

    if lines.len() > total {
        return Err(MultiError::ConfigError(format!(
            "{} input lines but only {} remote jobs ({} per host x {} hosts); raise --count",
            lines.len(),
            total,
            assignment.per_host(),
            assignment.host_count()
        )));
    }

    Ok((JobSet::from_items(total, &lines), assignment))
}
