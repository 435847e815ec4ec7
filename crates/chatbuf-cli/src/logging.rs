//! Tracing subscriber setup

use anyhow::anyhow;
use chatbuf_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG` when set, otherwise from the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber; logs go to stderr so stdout stays clean
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
