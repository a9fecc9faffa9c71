use crate::{
    HostError, HostResult,
    config::{default_container_format, default_output_name},
};

use std::panic::Location;

use error_location::ErrorLocation;
use media_grab_core::{CaptureCadence, ContainerFormat, EncoderConfig, SessionConfig};
use serde::{Deserialize, Serialize};

/// Frame sampling mode as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CadenceMode {
    /// Capture whenever the source presents a frame.
    #[default]
    FrameDriven,
    /// Capture at `frames_per_second`.
    Fixed,
}

/// Per-worker recording settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// File name each artifact is saved under.
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// MIME type and codec hint handed to the encoder.
    #[serde(default = "default_container_format")]
    pub container_format: String,

    /// Frame sampling mode.
    #[serde(default)]
    pub cadence: CadenceMode,

    /// Rate for the `fixed` cadence.
    #[serde(default)]
    pub frames_per_second: Option<f64>,

    /// Emit a chunk every N milliseconds instead of only on flush.
    #[serde(default)]
    pub chunk_interval_ms: Option<u64>,

    /// Target video bitrate.
    #[serde(default)]
    pub video_bits_per_second: Option<u32>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_name: default_output_name(),
            container_format: default_container_format(),
            cadence: CadenceMode::default(),
            frames_per_second: None,
            chunk_interval_ms: None,
            video_bits_per_second: None,
        }
    }
}

impl CaptureConfig {
    /// Builds the session configuration handed to every worker.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty or path-like output name, an empty
    /// container format, or a `fixed` cadence without a positive frame rate.
    #[track_caller]
    pub fn session_config(&self) -> HostResult<SessionConfig> {
        let name = self.output_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(HostError::ConfigError {
                reason: format!("Invalid output name: {:?}", self.output_name),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.container_format.trim().is_empty() {
            return Err(HostError::ConfigError {
                reason: "Container format must not be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let cadence = match (self.cadence, self.frames_per_second) {
            (CadenceMode::FrameDriven, _) => CaptureCadence::FrameDriven,
            (CadenceMode::Fixed, Some(fps)) if fps.is_finite() && fps > 0.0 => {
                CaptureCadence::Fixed {
                    frames_per_second: fps,
                }
            }
            (CadenceMode::Fixed, fps) => {
                return Err(HostError::ConfigError {
                    reason: format!("Fixed cadence needs a positive frames_per_second, got {fps:?}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(SessionConfig {
            output_name: name.to_string(),
            container_format: ContainerFormat::new(self.container_format.trim()),
            encoder: EncoderConfig {
                cadence,
                chunk_interval_ms: self.chunk_interval_ms,
                video_bits_per_second: self.video_bits_per_second,
            },
        })
    }
}
