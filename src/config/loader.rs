// src/config/loader.rs

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{MultiError, Result};
use crate::fs::FileSystem;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "MULTI_CONFIG";

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the checked form.
pub fn load_from_path(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    if !fs.is_file(path) {
        return Err(MultiError::ConfigError(format!(
            "config file {:?} does not exist",
            path
        )));
    }

    let contents = fs.read_to_string(path).map_err(|e| {
        MultiError::ConfigError(format!("could not read config file {:?}: {e:#}", path))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(fs: &dyn FileSystem, path: &Path) -> Result<ConfigFile> {
    let raw_config = load_from_path(fs, path)?;
    ConfigFile::try_from(raw_config)
}

/// Load the config file if one was selected, otherwise use defaults.
pub fn load_optional(fs: &dyn FileSystem, path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => load_and_validate(fs, path),
        None => Ok(ConfigFile::default()),
    }
}

/// Pick the config file: `--config` first, then `MULTI_CONFIG`.
pub fn resolve_config_path(cli: Option<PathBuf>, env: Option<OsString>) -> Option<PathBuf> {
    cli.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
}
