// src/core/config_loader.rs

use crate::{
    constants::{CONFIG_DIR_NAME, CONFIG_FILENAME, CONFIG_PATH_ENV},
    models::RunnerConfig,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Location of the config file: `$PROCLINE_CONFIG` if set, otherwise
/// `<config dir>/procline/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(explicit) = env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(explicit));
    }
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILENAME))
        .ok_or(ConfigError::ConfigDirNotFound)
}

/// Loads the user's defaults. A missing file means all defaults.
pub fn load_config() -> Result<RunnerConfig, ConfigError> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<RunnerConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No config file at '{}', using defaults.", path.display());
        return Ok(RunnerConfig::default());
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    log::debug!("Loaded config from '{}': {:?}", path.display(), config);
    Ok(config)
}
