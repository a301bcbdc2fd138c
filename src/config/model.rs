// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Connect timeout used when neither the CLI nor the config file sets one.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [ssh]
/// username = "deploy"
/// timeout = "30s"
/// identity = "/home/me/.ssh/id_ed25519"
/// no_agent = false
/// no_prefix = false
///
/// [output]
/// quiet = false
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub ssh: SshSection,

    #[serde(default)]
    pub output: OutputSection,
}

/// `[ssh]` section. Every field can be overridden on the command line.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SshSection {
    #[serde(default)]
    pub username: Option<String>,

    /// Duration string such as `"30s"` or `"1m"`.
    #[serde(default)]
    pub timeout: Option<String>,

    #[serde(default)]
    pub identity: Option<PathBuf>,

    #[serde(default)]
    pub no_agent: bool,

    #[serde(default)]
    pub no_prefix: bool,
}

/// `[output]` section.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct OutputSection {
    #[serde(default)]
    pub quiet: bool,
}

/// Validated configuration. Construct via `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub ssh: SshDefaults,
    pub output: OutputSection,
}

/// `[ssh]` after validation: the timeout is parsed.
#[derive(Debug, Clone)]
pub struct SshDefaults {
    pub username: Option<String>,
    pub timeout: Duration,
    pub identity: Option<PathBuf>,
    pub no_agent: bool,
    pub no_prefix: bool,
}

impl Default for SshDefaults {
    fn default() -> Self {
        Self {
            username: None,
            timeout: DEFAULT_CONNECT_TIMEOUT,
            identity: None,
            no_agent: false,
            no_prefix: false,
        }
    }
}
