use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a discovered media source.
///
/// Assigned by the discovery collaborator; the core only compares and logs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How much media data the source has buffered around its playback position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    /// No information about the media is available.
    HaveNothing = 0,
    /// Duration and dimensions are known, no frame data yet.
    HaveMetadata = 1,
    /// Data for the current position only.
    HaveCurrentData = 2,
    /// Data for the current position and at least a little ahead.
    HaveFutureData = 3,
    /// Enough data buffered to play through.
    HaveEnoughData = 4,
}

/// Read-only view of a source's playback attributes at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Current playback position in seconds.
    pub position_secs: f64,
    /// Whether playback is paused.
    pub paused: bool,
    /// Whether playback reached the end of the media.
    pub ended: bool,
    /// Buffering readiness.
    pub ready_state: ReadyState,
}

/// Returns `true` when the source is actively advancing.
///
/// The position must have moved off zero, playback must be neither paused nor
/// ended, and more than the current frame must be buffered.
pub fn is_playing(snapshot: &PlaybackSnapshot) -> bool {
    snapshot.position_secs > 0.0
        && !snapshot.paused
        && !snapshot.ended
        && snapshot.ready_state > ReadyState::HaveCurrentData
}

/// Lifecycle notifications emitted by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEvent {
    /// Playback started or resumed with data flowing.
    Playing,
    /// Playback was paused.
    Pause,
    /// Data delivery stalled.
    Stalled,
    /// Playback reached the end.
    Ended,
    /// The source disappeared from the host environment.
    Removed,
}

impl fmt::Display for SourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceEvent::Playing => write!(f, "playing"),
            SourceEvent::Pause => write!(f, "pause"),
            SourceEvent::Stalled => write!(f, "stalled"),
            SourceEvent::Ended => write!(f, "ended"),
            SourceEvent::Removed => write!(f, "removed"),
        }
    }
}

/// A playable media source owned by the host environment.
pub trait MediaSource {
    /// Identifier used for routing and logs.
    fn id(&self) -> SourceId;

    /// Current playback attributes.
    fn snapshot(&self) -> PlaybackSnapshot;
}

/// Enumerates the sources present in the host environment.
pub trait SourceDiscovery {
    /// Source handle type handed to workers.
    type Source: MediaSource;

    /// Sources in discovery order. An empty list is a valid answer.
    fn discover(&self) -> Vec<Self::Source>;
}
