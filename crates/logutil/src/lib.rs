//! Utilities for logging.
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    HumanReadable,
    Json,
}

/// Build an env filter from `RUST_LOG`, falling back to `default_level` when
/// unset.
pub fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

/// Configure the global logger.
///
/// Returns false if a global subscriber was already set.
pub fn configure_global_logger(default_level: Level, format: LogFormat) -> bool {
    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter(default_level))
        .with_file(true)
        .with_line_number(true);

    let result = match format {
        LogFormat::HumanReadable => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };

    result.is_ok()
}

/// Initialize logging for tests.
///
/// Safe to call from every test, only the first call installs a subscriber.
pub fn init_test() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder()
            .with_test_writer()
            .with_env_filter(env_filter(Level::DEBUG))
            .with_file(true)
            .with_line_number(true)
            .finish();
        // Another harness may have beaten us to it.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
