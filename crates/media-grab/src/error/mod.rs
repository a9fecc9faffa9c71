use media_grab_core::{CaptureError, SourceId};

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Host-level errors for the media-grab runtime.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum HostError {
    /// Capture error from media-grab-core.
    #[error("Capture error: {source} {location}")]
    Capture {
        /// The underlying capture error.
        #[source]
        source: CaptureError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading, saving or validation error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// No worker is registered for the source.
    #[error("Unknown source {source_id} {location}")]
    UnknownSource {
        /// Source that was addressed.
        source_id: SourceId,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// A worker thread did not shut down cleanly.
    #[error("Worker for source {source_id} failed to join: {reason} {location}")]
    WorkerJoinFailed {
        /// Source the worker was bound to.
        source_id: SourceId,
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Global tracing subscriber could not be installed.
    #[error("Tracing initialization failed: {reason} {location}")]
    TelemetryInitFailed {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From<CaptureError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<CaptureError> for HostError {
    #[track_caller]
    fn from(source: CaptureError) -> Self {
        HostError::Capture {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for HostError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        HostError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `HostError`.
pub type Result<T> = StdResult<T, HostError>;
