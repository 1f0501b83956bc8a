//! Secret key material.
//!
//! A [`Secret`] wraps its bytes in zeroizing storage so key material is
//! wiped when the last handle drops, and never shows up in debug output.
//! The same secret doubles as the encryption key and the signing key.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretSlice};

/// Shared secret key material.
#[derive(Clone, Debug)]
pub struct Secret {
    data: Arc<SecretSlice<u8>>,
}

impl Secret {
    /// Wraps raw key bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(SecretSlice::from(data)),
        }
    }

    /// Generates a fresh secret suitable for both encryption and signing.
    pub fn generate() -> Self {
        Self::new(fernet::Fernet::generate_key().into_bytes())
    }

    /// Borrows the secret bytes.
    ///
    /// Callers must not copy the bytes into storage that outlives the
    /// operation at hand.
    pub fn expose(&self) -> &[u8] {
        self.data.expose_secret()
    }

    /// Number of secret bytes.
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    /// Whether the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl From<&str> for Secret {
    fn from(key: &str) -> Self {
        Self::new(key.as_bytes().to_vec())
    }
}

impl From<String> for Secret {
    fn from(key: String) -> Self {
        Self::new(key.into_bytes())
    }
}
