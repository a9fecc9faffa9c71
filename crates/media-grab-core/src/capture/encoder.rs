use crate::{CoreResult, EncoderConfig};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tags one open→terminate lifetime of an encoder.
///
/// Every chunk and completion signal carries the cycle it was produced for, so
/// callbacks from an encoder that has since been replaced can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId(Uuid);

impl CycleId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for CycleId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Coarse encoder state as tracked by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderState {
    /// No encoder bound.
    Uninitialized,
    /// Bound to the source, not yet consuming it.
    Inactive,
    /// Consuming the source.
    Active,
    /// Bound but suspended.
    Suspended,
    /// Terminate requested, waiting for the completion signal.
    Terminated,
}

/// Asynchronous output of an encoder binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A slice of encoded bytes. May be empty.
    Chunk {
        /// Cycle the bytes belong to.
        cycle: CycleId,
        /// Encoded payload.
        data: Vec<u8>,
    },
    /// The encoder flushed its last chunk and shut down.
    Completed {
        /// Cycle that completed.
        cycle: CycleId,
    },
}

impl EncoderEvent {
    /// Cycle the event was produced for.
    pub fn cycle(&self) -> CycleId {
        match self {
            EncoderEvent::Chunk { cycle, .. } | EncoderEvent::Completed { cycle } => *cycle,
        }
    }
}

/// Wraps a live media source into a chunked encoded byte stream.
///
/// Only `open` can fail. The other operations are requests; their effects show
/// up later as [`EncoderEvent`]s delivered to the owning worker, tagged with the
/// cycle passed to `open`. The binding must deliver the final chunk before the
/// `Completed` signal of a cycle.
pub trait EncoderBinding<S> {
    /// Per-cycle encoder handle.
    type Handle;

    /// Binds a fresh encoder to `source`.
    fn open(&mut self, source: &S, config: &EncoderConfig, cycle: CycleId)
    -> CoreResult<Self::Handle>;

    /// Starts consuming the source.
    fn begin_active(&mut self, handle: &mut Self::Handle);

    /// Suspends consumption, keeping the encoder alive.
    fn suspend(&mut self, handle: &mut Self::Handle);

    /// Resumes a suspended encoder.
    fn resume(&mut self, handle: &mut Self::Handle);

    /// Flushes and shuts down; `Completed` follows asynchronously.
    fn terminate(&mut self, handle: &mut Self::Handle);
}
