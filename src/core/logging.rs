//! Tracing setup for applications using the SDK.
//!
//! Applications that already install their own subscriber can skip this
//! entirely; every SDK module emits plain `tracing` events.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Environment variable that switches log output to JSON when set to `1`.
pub const JSON_ENV_VAR: &str = "SAILS_LOG_JSON";

static INIT: OnceCell<()> = OnceCell::new();

/// Installs the global tracing subscriber used by SDK applications.
///
/// The filter honors `RUST_LOG` and defaults to `info`. Output is compact
/// text unless [`JSON_ENV_VAR`] is set to `1`. Calling this more than once
/// is a no-op, as is calling it after another subscriber was installed.
pub fn init_sdk() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let json = std::env::var(JSON_ENV_VAR).is_ok_and(|v| v == "1");

        if json {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .try_init();
        } else {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    });
}
