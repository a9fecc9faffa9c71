//! Playback-aware recording state machine.
//!
//! [`transition`] is a pure function of `(state, input)`. The worker applies the
//! returned [`EncoderAction`] to its encoder; nothing else mutates the state.

use crate::capture::SourceEvent;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Recording state of one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// No live encoder.
    #[default]
    Idle,
    /// Encoder bound, waiting for the source to play.
    Armed,
    /// Encoder consuming the source.
    Recording,
    /// Encoder suspended.
    Paused,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Idle => write!(f, "idle"),
            WorkerState::Armed => write!(f, "armed"),
            WorkerState::Recording => write!(f, "recording"),
            WorkerState::Paused => write!(f, "paused"),
        }
    }
}

/// Everything that can drive a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerInput {
    /// Caller asked to record. `ready` is the readiness predicate at call time.
    Start {
        /// Whether the source is currently advancing.
        ready: bool,
    },
    /// Caller asked to finish the recording.
    Stop,
    /// Caller asked to suspend the recording.
    Pause,
    /// The source reported a lifecycle change.
    Source(SourceEvent),
}

impl fmt::Display for WorkerInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerInput::Start { .. } => write!(f, "start"),
            WorkerInput::Stop => write!(f, "stop"),
            WorkerInput::Pause => write!(f, "pause"),
            WorkerInput::Source(event) => write!(f, "source {}", event),
        }
    }
}

/// What the worker must do to its encoder after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderAction {
    /// Leave the encoder alone.
    None,
    /// Bind a new encoder; begin consuming immediately when `begin` is set.
    Open {
        /// Start active encoding right after opening.
        begin: bool,
    },
    /// Start consuming on the existing encoder.
    BeginActive,
    /// Suspend the encoder.
    Suspend,
    /// Resume the suspended encoder.
    Resume,
    /// Flush and shut down; materialization follows completion.
    Terminate,
}

/// Result of applying one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State after the input.
    pub next: WorkerState,
    /// Encoder work required to get there.
    pub action: EncoderAction,
}

impl Transition {
    fn to(next: WorkerState, action: EncoderAction) -> Self {
        Self { next, action }
    }

    fn stay(state: WorkerState) -> Self {
        Self::to(state, EncoderAction::None)
    }

    /// Whether the input was ignored.
    pub fn is_noop(&self) -> bool {
        self.action == EncoderAction::None
    }
}

/// Computes the next state and encoder action for `input` in `state`.
pub fn transition(state: WorkerState, input: WorkerInput) -> Transition {
    use EncoderAction as A;
    use SourceEvent as E;
    use WorkerInput as I;
    use WorkerState as S;

    match (state, input) {
        (S::Idle, I::Start { ready: true }) => Transition::to(S::Recording, A::Open { begin: true }),
        (S::Idle, I::Start { ready: false }) => Transition::to(S::Armed, A::Open { begin: false }),
        (S::Idle, I::Stop | I::Pause | I::Source(_)) => Transition::stay(S::Idle),

        (S::Armed, I::Start { ready: true } | I::Source(E::Playing)) => {
            Transition::to(S::Recording, A::BeginActive)
        }
        (S::Armed, I::Start { ready: false } | I::Pause | I::Source(E::Pause | E::Stalled)) => {
            Transition::stay(S::Armed)
        }
        (S::Armed, I::Stop | I::Source(E::Ended | E::Removed)) => {
            Transition::to(S::Idle, A::Terminate)
        }

        (S::Recording, I::Pause | I::Source(E::Pause | E::Stalled)) => {
            Transition::to(S::Paused, A::Suspend)
        }
        (S::Recording, I::Start { .. } | I::Source(E::Playing)) => Transition::stay(S::Recording),
        (S::Recording, I::Stop | I::Source(E::Ended | E::Removed)) => {
            Transition::to(S::Idle, A::Terminate)
        }

        (S::Paused, I::Start { .. } | I::Source(E::Playing)) => {
            Transition::to(S::Recording, A::Resume)
        }
        (S::Paused, I::Pause | I::Source(E::Pause | E::Stalled)) => Transition::stay(S::Paused),
        (S::Paused, I::Stop | I::Source(E::Ended | E::Removed)) => {
            Transition::to(S::Idle, A::Terminate)
        }
    }
}
