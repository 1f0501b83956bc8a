//! File and directory utilities built around the SDK data directory.

use std::path::PathBuf;

use thiserror::Error;

use crate::security::encryption::EncryptionError;

pub mod directory;
pub mod encrypted_file;
pub mod observed_file;
pub mod paths;

pub use directory::{DirectoryError, ListResult, SdkDirectory};
pub use encrypted_file::{EncryptedFileReader, EncryptedFileWriter};
pub use observed_file::ObservedFile;

/// Errors raised by encrypted and observed file operations.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("timed out trying to find {}, likely file does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: anyhow::Error,
    },
}
