//! Command implementations.

pub mod config;
pub mod serve;

use glimpse_core::{Config, ConfigError};
use std::path::PathBuf;

/// Path of the config file in use: `--config` if given, else the default.
pub fn config_path(path: Option<&str>) -> PathBuf {
    match path {
        Some(path) => Config::expand_path(path),
        None => Config::default_path(),
    }
}

/// Load configuration, honoring `--config`.
///
/// An explicit path must exist; the default location falls back to defaults.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    match path {
        Some(_) => Config::load_from(&config_path(path)),
        None => Config::load(),
    }
}
