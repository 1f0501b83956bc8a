//! The per-user SDK data directory.
//!
//! SDK artifacts such as saved profiles live under a single root,
//! `~/.overflow/sails` by default. The directory is created on first use
//! and marked hidden on Windows unless configured otherwise.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::{ConfigError, SdkConfig};
use crate::data::paths;

/// Errors raised while creating or reading the SDK data directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Files and subfolders found directly inside a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    pub files: Vec<String>,
    pub subfolders: Vec<String>,
}

/// Handle to the SDK data directory.
#[derive(Debug, Clone)]
pub struct SdkDirectory {
    root: PathBuf,
}

impl SdkDirectory {
    /// Opens the data directory configured by the environment, creating
    /// it if missing.
    pub fn open() -> Result<Self, DirectoryError> {
        Self::with_config(&SdkConfig::from_env())
    }

    /// Opens the data directory described by `config`, creating it if
    /// missing.
    pub fn with_config(config: &SdkConfig) -> Result<Self, DirectoryError> {
        let root = config.resolve_root()?;

        if !root.exists() {
            fs::create_dir_all(&root).map_err(|source| DirectoryError::Create {
                path: root.clone(),
                source,
            })?;
            if config.hide_directory {
                if let Err(error) = paths::hide(&root) {
                    warn!(path = %root.display(), %error, "could not hide sdk directory");
                }
            }
            debug!(path = %root.display(), "created sdk directory");
        }

        Ok(Self { root })
    }

    /// The absolute root of the data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The absolute path for `relative` inside the data directory.
    ///
    /// Leading separators and parent components are dropped so the result
    /// always stays inside the root.
    pub fn path_for(&self, relative: impl AsRef<Path>) -> PathBuf {
        let contained: PathBuf = relative
            .as_ref()
            .components()
            .filter(|component| matches!(component, Component::Normal(_)))
            .collect();
        self.root.join(contained)
    }

    /// Creates (if needed) and returns a subdirectory of the root.
    pub fn ensure_subdir(&self, name: impl AsRef<Path>) -> Result<PathBuf, DirectoryError> {
        let path = self.path_for(name);
        fs::create_dir_all(&path).map_err(|source| DirectoryError::Create {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Lists the files and subfolders directly inside `subfolder`
    /// (relative to the root; an empty string lists the root itself).
    ///
    /// Entries that are neither regular files nor directories are
    /// skipped. Names come back sorted.
    pub fn list(&self, subfolder: &str) -> Result<ListResult, DirectoryError> {
        let folder = self.path_for(subfolder);
        let entries = fs::read_dir(&folder).map_err(|source| DirectoryError::List {
            path: folder.clone(),
            source,
        })?;

        let mut result = ListResult::default();
        for entry in entries {
            let entry = entry.map_err(|source| DirectoryError::List {
                path: folder.clone(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            if path.is_dir() {
                result.subfolders.push(name);
            } else if path.is_file() {
                result.files.push(name);
            }
        }

        result.files.sort();
        result.subfolders.sort();
        Ok(result)
    }
}
