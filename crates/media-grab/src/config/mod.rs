mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod download_config;
mod logging_config;

pub use {
    capture_config::{CadenceMode, CaptureConfig},
    config::Config,
    download_config::DownloadConfig,
    logging_config::{LogFormat, LoggingConfig},
};

use std::path::PathBuf;

use directories::{ProjectDirs, UserDirs};
use media_grab_core::{LogLevel, SessionConfig};

pub(crate) const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Low;

pub(crate) fn default_output_name() -> String {
    SessionConfig::default().output_name
}

pub(crate) fn default_container_format() -> String {
    SessionConfig::default().container_format.as_str().to_string()
}

pub(crate) fn default_log_level() -> LogLevel {
    DEFAULT_LOG_LEVEL
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "media-grab", "Media-Grab")
}

/// The user's download folder, else the app data dir, else `./downloads`.
pub(crate) fn default_output_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(PathBuf::from))
        .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("downloads")))
        .unwrap_or_else(|| PathBuf::from("downloads"))
}
