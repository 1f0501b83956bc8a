//! Symmetric message encryption.
//!
//! Messages are XOR-masked with the secret bytes and then sealed in a
//! Fernet token. The mask is a repeating-key XOR, so applying it again
//! after decryption restores the plaintext. Fernet provides the actual
//! confidentiality and integrity; the mask keeps the sealed plaintext
//! from ever being the raw message bytes.

use fernet::Fernet;
use thiserror::Error;
use zeroize::Zeroize;

use crate::security::secret::Secret;

/// Errors raised while encrypting or decrypting a message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("the secret is not a valid encryption key")]
    Key,

    #[error("the token is not valid for this secret")]
    Token,

    #[error("the decrypted message is not valid utf-8")]
    Utf8,
}

/// Encrypts `message` with `secret`, returning a Fernet token.
pub fn encrypt(message: &str, secret: &Secret) -> Result<String, EncryptionError> {
    let fernet = cipher(secret)?;
    let mut masked = message.as_bytes().to_vec();
    mask(&mut masked, secret.expose());
    let token = fernet.encrypt(&masked);
    masked.zeroize();
    Ok(token)
}

/// Decrypts a token produced by [`encrypt`] back into the message.
pub fn decrypt(token: &str, secret: &Secret) -> Result<String, EncryptionError> {
    let fernet = cipher(secret)?;
    let mut plain = fernet.decrypt(token).map_err(|_| EncryptionError::Token)?;
    mask(&mut plain, secret.expose());
    String::from_utf8(plain).map_err(|error| {
        let mut bytes = error.into_bytes();
        bytes.zeroize();
        EncryptionError::Utf8
    })
}

fn cipher(secret: &Secret) -> Result<Fernet, EncryptionError> {
    let key = std::str::from_utf8(secret.expose()).map_err(|_| EncryptionError::Key)?;
    Fernet::new(key).ok_or(EncryptionError::Key)
}

/// Repeating-key XOR. Applying it twice with the same key restores the
/// input.
fn mask(data: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }
    for (index, byte) in data.iter_mut().enumerate() {
        *byte ^= key[index % key.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let secret = Secret::generate();
        let token = encrypt("attack at dawn", &secret).unwrap();
        assert_eq!(decrypt(&token, &secret).unwrap(), "attack at dawn");
    }

    #[test]
    fn unicode_round_trips() {
        let secret = Secret::generate();
        let message = "segel ⛵ år";
        let token = encrypt(message, &secret).unwrap();
        assert_eq!(decrypt(&token, &secret).unwrap(), message);
    }

    #[test]
    fn empty_message_round_trips() {
        let secret = Secret::generate();
        let token = encrypt("", &secret).unwrap();
        assert_eq!(decrypt(&token, &secret).unwrap(), "");
    }

    #[test]
    fn wrong_secret_fails() {
        let token = encrypt("hidden", &Secret::generate()).unwrap();
        assert_eq!(
            decrypt(&token, &Secret::generate()),
            Err(EncryptionError::Token)
        );
    }

    #[test]
    fn invalid_key_material_is_rejected() {
        let secret = Secret::from("not a fernet key");
        assert_eq!(encrypt("msg", &secret), Err(EncryptionError::Key));
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let secret = Secret::generate();
        let mut token = encrypt("msg", &secret).unwrap();
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });
        assert_eq!(decrypt(&token, &secret), Err(EncryptionError::Token));
    }

    #[test]
    fn non_utf8_plaintext_is_rejected() {
        let secret = Secret::generate();
        let mut payload = vec![0xFF, 0xFE, 0xFD];
        mask(&mut payload, secret.expose());
        let token = cipher(&secret).unwrap().encrypt(&payload);
        assert_eq!(decrypt(&token, &secret), Err(EncryptionError::Utf8));
    }

    #[test]
    fn mask_is_an_involution() {
        let key = b"key";
        let mut data = b"some plaintext".to_vec();
        mask(&mut data, key);
        assert_ne!(data, b"some plaintext");
        mask(&mut data, key);
        assert_eq!(data, b"some plaintext");
    }

    #[test]
    fn sealed_plaintext_is_masked() {
        let secret = Secret::generate();
        let token = encrypt("visible", &secret).unwrap();

        let key = std::str::from_utf8(secret.expose()).unwrap();
        let inner = Fernet::new(key).unwrap().decrypt(&token).unwrap();
        assert_ne!(inner, b"visible");

        let mut unmasked = inner;
        mask(&mut unmasked, secret.expose());
        assert_eq!(unmasked, b"visible");
    }
}
