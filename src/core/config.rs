//! SDK configuration.
//!
//! Resolution order is environment first, then an optional TOML file, then
//! built-in defaults. The only settings are where the SDK data directory
//! lives and whether it is marked hidden on Windows.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory under the user's home that holds SDK data by default.
pub const DEFAULT_FOLDER: &str = ".overflow/sails";

/// Environment variable that overrides the SDK data directory root.
pub const ROOT_ENV_VAR: &str = "SAILS_HOME";

/// Environment variable that disables hidden-attribute marking when set.
pub const NO_HIDE_ENV_VAR: &str = "SAILS_NO_HIDE";

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("home directory could not be determined")]
    HomeNotFound,

    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings controlling where the SDK keeps its data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Explicit data directory root. When absent the root defaults to
    /// [`DEFAULT_FOLDER`] under the user's home directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Whether the data directory is marked hidden on Windows.
    #[serde(default = "default_hide")]
    pub hide_directory: bool,
}

fn default_hide() -> bool {
    true
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            root: None,
            hide_directory: true,
        }
    }
}

impl SdkConfig {
    /// Builds a configuration from the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Loads a TOML configuration file, then applies environment overrides
    /// on top of it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let mut config: SdkConfig = toml::from_str(&text)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(root) = std::env::var_os(ROOT_ENV_VAR) {
            self.root = Some(PathBuf::from(root));
        }
        if std::env::var_os(NO_HIDE_ENV_VAR).is_some() {
            self.hide_directory = false;
        }
    }

    /// Resolves the configured data directory root to an absolute path.
    pub fn resolve_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => Ok(home_dir()?.join(DEFAULT_FOLDER)),
        }
    }
}

fn home_dir() -> Result<PathBuf, ConfigError> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .ok_or(ConfigError::HomeNotFound)
}
