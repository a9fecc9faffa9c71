use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_OUTPUT_NAME: &str = "video.webm";
pub(crate) const DEFAULT_CONTAINER_FORMAT: &str = "video/webm;codecs=vp9";

/// MIME type plus optional codec hint, e.g. `video/webm;codecs=vp9`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerFormat(String);

impl ContainerFormat {
    /// Wraps a MIME string as given.
    pub fn new(mime: impl Into<String>) -> Self {
        Self(mime.into())
    }

    /// Full MIME string including codec parameters.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type without parameters (`video/webm`).
    pub fn essence(&self) -> &str {
        self.0.split(';').next().unwrap_or_default().trim()
    }

    /// Conventional file extension for the container (`webm`, `mp4`, ...).
    pub fn extension(&self) -> &str {
        match self.essence().split_once('/') {
            Some((_, "x-matroska")) => "mkv",
            Some((_, "quicktime")) => "mov",
            Some((_, subtype)) if !subtype.is_empty() => subtype,
            _ => "bin",
        }
    }
}

impl Default for ContainerFormat {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_FORMAT)
    }
}

/// When the encoder samples frames from the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum CaptureCadence {
    /// A frame is captured whenever the source presents one.
    #[default]
    FrameDriven,
    /// Frames are sampled at a fixed rate.
    Fixed {
        /// Sampling rate.
        frames_per_second: f64,
    },
}

/// Encoder tuning handed to the binding on `open`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EncoderConfig {
    /// Frame sampling cadence.
    #[serde(default)]
    pub cadence: CaptureCadence,
    /// Ask the encoder to emit a chunk every N milliseconds (None = only on flush).
    #[serde(default)]
    pub chunk_interval_ms: Option<u64>,
    /// Target video bitrate (None = encoder default).
    #[serde(default)]
    pub video_bits_per_second: Option<u32>,
}

/// Immutable per-session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File name the artifact is offered under.
    pub output_name: String,
    /// Container and codec of the emitted artifact.
    pub container_format: ContainerFormat,
    /// Encoder tuning.
    pub encoder: EncoderConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            container_format: ContainerFormat::default(),
            encoder: EncoderConfig::default(),
        }
    }
}
