//! Expiring HMAC message signatures.
//!
//! A signed token is the url-safe base64 encoding of a 7 byte header
//! followed by an HMAC-SHA384 digest. The header packs a version byte,
//! two zero pad bytes, and the expiry as a little-endian u32 of unix
//! seconds. The digest covers the header plus the message bytes, so a
//! token is only valid for the exact message it was issued for.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha384;
use thiserror::Error;

use crate::security::secret::Secret;

type HmacSha384 = Hmac<Sha384>;

/// Current signature header version.
pub const VERSION: u8 = 1;

const HEADER_LEN: usize = 7;
const DIGEST_LEN: usize = 48;

/// Errors raised while signing or verifying a token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("the signature was corrupt and cannot be read")]
    Corrupt,

    #[error("the signature has expired and is no longer valid")]
    Expired,

    #[error("the signature digest is not the same, the signature is not valid")]
    Mismatch,

    #[error("the secret cannot be used as a signing key")]
    Key,
}

/// Decoded header of a verified signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Header version the token was issued with.
    pub version: u8,
    /// Expiry as unix seconds.
    pub expiry: u32,
}

/// Signs `message` with `secret`, producing a token valid for `max_age`.
///
/// Expiry times past the year 2106 saturate at the maximum the header can
/// carry.
pub fn sign(secret: &Secret, message: &str, max_age: Duration) -> Result<String, SignatureError> {
    let expiry_at = unix_now().saturating_add(max_age.as_secs());
    let expiry = u32::try_from(expiry_at).unwrap_or(u32::MAX);
    let header = pack_header(VERSION, expiry);

    let mut mac = keyed_mac(secret)?;
    mac.update(&header);
    mac.update(message.as_bytes());
    let digest = mac.finalize().into_bytes();

    let mut payload = Vec::with_capacity(HEADER_LEN + DIGEST_LEN);
    payload.extend_from_slice(&header);
    payload.extend_from_slice(&digest);
    Ok(URL_SAFE.encode(payload))
}

/// Verifies a token against `message` and `secret`, returning the decoded
/// header on success.
///
/// Fails with [`SignatureError::Corrupt`] when the token cannot be read,
/// [`SignatureError::Expired`] when its expiry has passed, and
/// [`SignatureError::Mismatch`] when the digest does not match.
pub fn verify(
    secret: &Secret,
    message: &str,
    token: &str,
) -> Result<SignatureHeader, SignatureError> {
    let decoded = URL_SAFE.decode(token).map_err(|_| SignatureError::Corrupt)?;
    if decoded.len() < HEADER_LEN {
        return Err(SignatureError::Corrupt);
    }

    let (header, digest) = decoded.split_at(HEADER_LEN);
    let version = header[0];
    let expiry = u32::from_le_bytes([header[3], header[4], header[5], header[6]]);

    if version != VERSION {
        return Err(SignatureError::Corrupt);
    }
    if digest.len() != DIGEST_LEN {
        return Err(SignatureError::Corrupt);
    }
    if unix_now() > u64::from(expiry) {
        return Err(SignatureError::Expired);
    }

    let mut mac = keyed_mac(secret)?;
    mac.update(header);
    mac.update(message.as_bytes());
    mac.verify_slice(digest)
        .map_err(|_| SignatureError::Mismatch)?;

    Ok(SignatureHeader { version, expiry })
}

fn keyed_mac(secret: &Secret) -> Result<HmacSha384, SignatureError> {
    HmacSha384::new_from_slice(secret.expose()).map_err(|_| SignatureError::Key)
}

fn pack_header(version: u8, expiry: u32) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[0] = version;
    header[3..7].copy_from_slice(&expiry.to_le_bytes());
    header
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
