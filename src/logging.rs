//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events; binaries call
//! [`init_tracing`] once at startup.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins when set, otherwise the configured level applies.
/// Returns `false` if a subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_ascii_lowercase()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(config.with_target).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok()
}

/// Initialize tracing for tests (only logs warnings and above)
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_test_tracing();
        assert!(!init_tracing(&LoggingConfig::default()));
    }
}
