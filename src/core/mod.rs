//! Fundamental SDK building blocks: errors, config, logging, retries.

pub mod config;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod random;
pub mod retry;
