//! Secret handling, message signatures, symmetric encryption.

pub mod encryption;
pub mod secret;
pub mod signature;
