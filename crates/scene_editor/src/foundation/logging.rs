//! Logging utilities
//!
//! The editor logs through the `log` facade; hosts pick the backend. `init`
//! wires up `env_logger` for binaries that have no logger of their own.

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
