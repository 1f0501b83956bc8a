//! Crate-wide error surface.
//!
//! Each area of the SDK defines its own error enum next to the code that
//! produces it. This module aggregates them into a single [`Error`] so that
//! applications can funnel any SDK failure through one `Result` alias.

use thiserror::Error;

pub use crate::core::config::ConfigError;
pub use crate::data::directory::DirectoryError;
pub use crate::data::FileError;
pub use crate::profiling::ProfileError;
pub use crate::security::encryption::EncryptionError;
pub use crate::security::signature::SignatureError;

/// Any error produced by the SDK.
#[derive(Debug, Error)]
pub enum Error {
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("encryption error: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("file error: {0}")]
    File(#[from] FileError),

    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("profiling error: {0}")]
    Profile(#[from] ProfileError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the SDK.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_errors_convert() {
        let err: Error = SignatureError::Expired.into();
        assert!(matches!(err, Error::Signature(SignatureError::Expired)));
        assert!(err.to_string().starts_with("signature error"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(err.to_string().contains("gone"));
    }
}
