use crate::SourceId;

use error_location::ErrorLocation;
use thiserror::Error;

/// Capture pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The encoder could not be bound to the source (nothing capturable).
    #[error("Encoder open failed for source {source_id}: {reason} {location}")]
    EncoderOpenFailed {
        /// Source whose encoder failed to open.
        source_id: SourceId,
        /// Description of the failure reported by the binding.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Termination completed with no bytes accumulated.
    #[error("Nothing recorded for source {source_id}, no artifact emitted {location}")]
    EmptyArtifact {
        /// Source whose cycle produced no data.
        source_id: SourceId,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The download collaborator rejected the artifact.
    #[error("Download of {file_name} failed: {reason} {location}")]
    DownloadFailed {
        /// Name the artifact was offered under.
        file_name: String,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A worker could not be reached (its task is gone or its inbox is full).
    #[error("Worker for source {source_id} unavailable: {reason} {location}")]
    WorkerUnavailable {
        /// Source the worker is bound to.
        source_id: SourceId,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A worker panicked while handling a fan-out command.
    #[error("Worker for source {source_id} panicked {location}")]
    WorkerPanicked {
        /// Source the worker is bound to.
        source_id: SourceId,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
