//! Media-grab Core Library
//!
//! Records every playable media source of a host environment into its own
//! artifact. Each source gets a [`RecordingWorker`] that keeps a chunked
//! encoder in lockstep with the source's playback; an [`Orchestrator`] fans
//! `start`/`stop` out to all of them.
//!
//! The host supplies the collaborators: [`SourceDiscovery`], one
//! [`EncoderBinding`] per worker and a [`DownloadTrigger`].
//!
//! # Example
//!
//! ```no_run
//! use media_grab_core::{
//!     DownloadTrigger, EncoderBinding, EventLogger, LogLevel, Orchestrator, RecordingWorker,
//!     SessionConfig, SourceDiscovery,
//! };
//!
//! use std::sync::Arc;
//!
//! fn record_all<D, E>(discovery: &D, downloads: Arc<dyn DownloadTrigger>, encoder: E)
//! where
//!     D: SourceDiscovery,
//!     E: EncoderBinding<D::Source> + Clone,
//! {
//!     let logger = EventLogger::new(LogLevel::Low);
//!     let mut orchestrator = Orchestrator::new(discovery, |source| {
//!         RecordingWorker::new(
//!             source,
//!             encoder.clone(),
//!             Arc::clone(&downloads),
//!             SessionConfig::default(),
//!             logger,
//!         )
//!     });
//!
//!     orchestrator.start_all();
//!     // ... route source and encoder events to `orchestrator.worker_mut(id)` ...
//!     orchestrator.stop_all();
//! }
//! ```

mod capture;
mod error;
mod logging;

pub use {
    capture::{
        Artifact, CaptureCadence, ContainerFormat, CycleId, DownloadTrigger, EncoderAction,
        EncoderBinding, EncoderConfig, EncoderEvent, EncoderState, MediaSource, Orchestrator,
        PlaybackSnapshot, ReadyState, RecordingWorker, SessionConfig, SourceDiscovery,
        SourceEvent, SourceId, Transition, Worker, WorkerInput, WorkerState, is_playing,
        transition,
    },
    error::{CaptureError, Result as CoreResult},
    logging::{EventLogger, LogLevel},
};

#[cfg(test)]
mod tests;
