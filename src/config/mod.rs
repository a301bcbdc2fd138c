// src/config/mod.rs

//! Configuration loading and validation for multi.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load an optional config file from disk (`loader.rs`).
//! - Validate it and parse duration strings (`validate.rs`).
//! - Merge CLI flags over file values into run settings (`settings.rs`).

pub mod loader;
pub mod model;
pub mod settings;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_optional, resolve_config_path};
pub use model::{ConfigFile, OutputSection, RawConfigFile, SshDefaults, SshSection};
pub use settings::{resolve_quiet, SshSettings};
pub use validate::parse_duration;
