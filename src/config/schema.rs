//! Configuration validation
//!
//! This module provides validation logic for configuration files.

use crate::config::parse::ConfigSource;
use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for key in config.environment.keys() {
        validate_environment_key(key)?;
    }

    if let Some(dir) = &config.project_dir {
        if dir.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "project-dir must not be empty".to_string(),
            ));
        }
    }

    if let Some(dotenv) = &config.dotenv {
        if dotenv.trim().is_empty() {
            return Err(ConfigError::Invalid("dotenv must not be empty".to_string()));
        }
    }

    Ok(())
}

/// Validate a configuration together with where it was loaded from
///
/// The per-user config applies to every project, so it cannot pick the
/// directory the packaging tool runs in.
pub fn validate_config_source(config: &Config, source: ConfigSource) -> ConfigResult<()> {
    validate_config(config)?;

    if source == ConfigSource::User && config.project_dir.is_some() {
        return Err(ConfigError::Invalid(
            "project-dir cannot be set in the user config".to_string(),
        ));
    }

    Ok(())
}

/// Check that a name can be passed to a child process as an environment variable
pub fn validate_environment_key(key: &str) -> ConfigResult<()> {
    if key.is_empty() || key.contains('=') || key.contains('\0') {
        return Err(ConfigError::InvalidEnvironmentKey(key.to_string()));
    }
    Ok(())
}

/// Resolve the directory the packaging tool runs in
///
/// `project-dir` is relative to `base_dir` (the config file's directory);
/// without it the base directory itself is used.
pub fn resolve_project_dir(config: &Config, base_dir: &Path) -> ConfigResult<PathBuf> {
    let dir = match &config.project_dir {
        Some(dir) => base_dir.join(dir),
        None => base_dir.to_path_buf(),
    };

    if !dir.is_dir() {
        return Err(ConfigError::ProjectDir(dir));
    }

    Ok(dir)
}
