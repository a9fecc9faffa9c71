//! Tracing subscriber setup.

use crate::{
    HostError, HostResult,
    config::{LogFormat, LoggingConfig},
};

use std::panic::Location;

use error_location::ErrorLocation;
use media_grab_core::LogLevel;
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::None => "media_grab=warn,media_grab_core=warn",
        LogLevel::Low => "media_grab=info,media_grab_core=info",
        LogLevel::High => "media_grab=debug,media_grab_core=debug",
    }
}

/// Install the global fmt subscriber in the configured format. `RUST_LOG`
/// overrides the configured level.
///
/// # Errors
///
/// Returns `TelemetryInitFailed` if a global subscriber is already set.
#[track_caller]
pub fn init_tracing(config: &LoggingConfig) -> HostResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| HostError::TelemetryInitFailed {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}
