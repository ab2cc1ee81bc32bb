//! Tracing subscriber setup for the binary

use crate::config::LoggingConfig;
use crate::GeofinderError;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the configured level;
/// `verbose` raises the default to `debug`. Logs go to stderr so they do not
/// interleave with the panels printed on stdout.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<(), GeofinderError> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("geofinder={level},warn")))
        .map_err(|e| GeofinderError::config(format!("Invalid log filter: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };

    result.map_err(|e| GeofinderError::config(format!("Failed to initialise logging: {e}")))
}
