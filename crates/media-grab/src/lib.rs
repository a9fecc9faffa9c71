//! Media-grab: records every media source of a host environment to disk.
//!
//! Wraps `media-grab-core` with what a running host needs: TOML
//! configuration, tracing setup, a filesystem download trigger and one
//! thread-confined worker per source behind a [`CaptureHost`].

mod config;
mod downloader;
mod error;
mod host;
mod telemetry;
mod worker_task;

pub use {
    config::{CadenceMode, CaptureConfig, Config, DownloadConfig, LogFormat, LoggingConfig},
    downloader::FileDownloader,
    error::{HostError, Result as HostResult},
    host::CaptureHost,
    telemetry::{default_directive, init_tracing},
    worker_task::{EncoderEventSender, WorkerMailbox, WorkerMessage, spawn_worker},
};
