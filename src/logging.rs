//! Logging setup.
//!
//! The engine only emits `tracing` events. Hosts that have no subscriber of
//! their own can call [`init`] once at startup.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a formatting subscriber.
///
/// The level filter comes from `RUST_LOG` and defaults to `info`, e.g.
/// `RUST_LOG=depot_schedule=debug`.
///
/// # Panics
/// Panics if a global subscriber is already installed.
///
/// ```no_run
/// depot_schedule::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Debug-level subscriber for tests. Safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::debug!("logging initialized twice");
    }
}
