//! Child environment assembly
//!
//! Merges the optional dotenv file with the `environment` table. Table
//! entries win over dotenv entries and may reference either source.

use crate::config::interpolate::interpolate;
use crate::config::schema::validate_environment_key;
use crate::config::types::Config;
use crate::error::{ConfigError, PkgtaskError};
use std::collections::BTreeMap;
use std::path::Path;

/// Read a dotenv file into a map
pub fn load_dotenv(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    let dotenv_err = |error: String| ConfigError::Dotenv {
        path: path.to_path_buf(),
        error,
    };

    let iter = dotenvy::from_path_iter(path).map_err(|e| dotenv_err(e.to_string()))?;

    let mut vars = BTreeMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| dotenv_err(e.to_string()))?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Build the extra environment for the packaging tool
///
/// `base_dir` is the directory relative paths in the config resolve against.
pub fn resolve_environment(
    config: &Config,
    base_dir: &Path,
) -> Result<BTreeMap<String, String>, PkgtaskError> {
    let mut env = match &config.dotenv {
        Some(file) => load_dotenv(&base_dir.join(file))?,
        None => BTreeMap::new(),
    };

    // Lookups see dotenv entries only, never other table entries
    let dotenv_vars = env.clone();
    for (key, value) in &config.environment {
        validate_environment_key(key)?;
        let value = interpolate(value, &dotenv_vars)?;
        env.insert(key.clone(), value);
    }

    Ok(env)
}
