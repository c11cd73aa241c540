//! Logging setup for subtitler
//!
//! Installs a `tracing-subscriber` registry with an env filter and either a
//! human-readable or a JSON formatter.

use subtitler_config::{LogConfig, LogFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber from configuration
///
/// `RUST_LOG`, when set and valid, takes precedence over the configured
/// filter. An invalid configured filter falls back to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let filter = build_filter(config);

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_once() {
        let config = LogConfig {
            filter: "not a [valid filter".to_string(),
            format: LogFormat::Json,
        };

        init(&config).unwrap();
        tracing::info!("subscriber installed");

        assert!(init(&LogConfig::default()).is_err());
    }
}
