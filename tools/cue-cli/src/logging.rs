//! Log subscriber initialisation.

use anyhow::{Context, Result};
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Logs go to stderr so `--json` output on
/// stdout stays machine-readable.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = build_env_filter(config, verbose);

    match config.format {
        LogFormat::Human => init_with_layer(
            filter,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        ),
        LogFormat::Json => init_with_layer(
            filter,
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::io::stderr),
        ),
    }
}

fn build_env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { config.level.as_str() };
        EnvFilter::new(level)
    })
}

fn init_with_layer<L>(filter: EnvFilter, fmt_layer: L) -> Result<()>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .context("Failed to initialise logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_level() {
        std::env::remove_var("RUST_LOG");
        let config = LoggingConfig::default();
        assert_eq!(build_env_filter(&config, true).to_string(), "debug");
        assert_eq!(build_env_filter(&config, false).to_string(), "info");
    }
}
