//! Sails SDK library root

pub mod core;
pub mod data;
pub mod profiling;
pub mod security;

// Root re-exports so applications keep short import paths
pub use crate::core::config::SdkConfig;
pub use crate::core::error::{Error, Result};
pub use crate::core::logging::init_sdk;
pub use crate::core::retry::RetryPolicy;
pub use crate::data::directory::SdkDirectory;
pub use crate::security::secret::Secret;

// Core modules
pub use crate::core::config;
pub use crate::core::datetime;
pub use crate::core::error;
pub use crate::core::logging;
pub use crate::core::random;
pub use crate::core::retry;

// Data modules
pub use crate::data::directory;
pub use crate::data::encrypted_file;
pub use crate::data::observed_file;
pub use crate::data::paths;

// Security modules
pub use crate::security::encryption;
pub use crate::security::secret;
pub use crate::security::signature;

// Export the timed attribute at crate root
#[cfg(feature = "proc_macros")]
pub use sails_macros::timed;

/// The SDK version, as recorded in the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module that re-exports the most commonly used types and functions.
///
/// This is intended to provide a convenient way to import all the essential
/// types and functions with a single `use sails_sdk::prelude::*` statement.
pub mod prelude {
    // Core types and functions
    pub use crate::core::config::SdkConfig;
    pub use crate::core::error::{Error, Result};
    pub use crate::core::logging::init_sdk;
    pub use crate::core::random::random_string;
    pub use crate::core::retry::RetryPolicy;

    // Data types
    pub use crate::data::directory::{ListResult, SdkDirectory};
    pub use crate::data::encrypted_file::{EncryptedFileReader, EncryptedFileWriter};
    pub use crate::data::observed_file::ObservedFile;

    // Profiling
    pub use crate::profiling::{Profiler, ScopeTimer};

    // Security
    pub use crate::security::encryption;
    pub use crate::security::secret::Secret;
    pub use crate::security::signature::{self, SignatureHeader};

    // Export the timed attribute in the prelude too
    #[cfg(feature = "proc_macros")]
    pub use crate::timed;

    pub use crate::VERSION;
}
