//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, PkgtaskError};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["pkgtask.yml", "pkgtask.yaml"];

/// File name of the per-user fallback config
const USER_CONFIG_FILE_NAME: &str = "config.yml";

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_file_from)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> Option<PathBuf> {
    let mut current_dir = start_dir;

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        // Try parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return None,
        }
    }
}

/// Location of the per-user config file, if the platform has one and it exists
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pkgtask")
        .map(|dirs| dirs.config_dir().join(USER_CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, PkgtaskError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()).into());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read file: {}", e)))?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, PkgtaskError> {
    // An empty document is a valid, empty config
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }

    Ok(serde_yaml::from_str(yaml)?)
}

/// Where a loaded config file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named with `--file`
    Explicit,
    /// Found in the current directory or one of its parents
    Project,
    /// The per-user fallback file
    User,
}

/// A parsed config file with its location
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    pub source: ConfigSource,
}

/// Load the configuration to use
///
/// An explicit path must exist. Without one, the project config is searched
/// upwards from the current directory, then the per-user config is tried.
/// `None` means no config file applies.
pub fn load_config(explicit: Option<&Path>) -> Result<Option<LoadedConfig>, PkgtaskError> {
    let found = match explicit {
        Some(path) => Some((path.to_path_buf(), ConfigSource::Explicit)),
        None => find_config_file()
            .map(|path| (path, ConfigSource::Project))
            .or_else(|| user_config_file().map(|path| (path, ConfigSource::User))),
    };

    match found {
        Some((path, source)) => {
            let config = parse_config_file(&path)?;
            Ok(Some(LoadedConfig {
                config,
                path,
                source,
            }))
        }
        None => Ok(None),
    }
}
