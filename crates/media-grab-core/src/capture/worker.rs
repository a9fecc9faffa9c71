use crate::{
    CaptureError, CoreResult, EventLogger,
    capture::{
        Artifact, CycleId, DownloadTrigger, EncoderAction, EncoderBinding, EncoderEvent,
        EncoderState, MediaSource, SessionConfig, SourceEvent, SourceId, Transition, WorkerInput,
        WorkerState, is_playing, transition,
    },
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

/// One open→terminate lifetime of an encoder and the bytes it produced.
struct Cycle<H> {
    id: CycleId,
    handle: H,
    encoder_state: EncoderState,
    chunks: Vec<Vec<u8>>,
}

impl<H> Cycle<H> {
    fn new(id: CycleId, handle: H) -> Self {
        Self {
            id,
            handle,
            encoder_state: EncoderState::Inactive,
            chunks: Vec::new(),
        }
    }

    fn buffered_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}

/// Records one media source into one artifact per start→stop cycle.
///
/// The worker owns its encoder binding and chunk buffer. All state changes go
/// through [`transition`]; the methods here only feed it inputs and carry out
/// the encoder action it returns.
///
/// # Cycles
///
/// Each successful `open` starts a new cycle with its own buffer. After
/// `terminate` the cycle keeps accepting chunks until the encoder's completion
/// signal, then it is materialized and dropped. A `start()` in the meantime
/// opens a fresh cycle, so late chunks of the old one never leak into it and
/// chunks arriving after materialization are rejected.
///
/// # Thread Safety
///
/// Not thread-safe. Confine each worker to a single thread or task and reach
/// it by message passing.
pub struct RecordingWorker<S, E: EncoderBinding<S>> {
    source: S,
    source_id: SourceId,
    encoder: E,
    downloads: Arc<dyn DownloadTrigger>,
    config: SessionConfig,
    logger: EventLogger,
    state: WorkerState,
    live: Option<Cycle<E::Handle>>,
    draining: Vec<Cycle<E::Handle>>,
}

impl<S, E> RecordingWorker<S, E>
where
    S: MediaSource,
    E: EncoderBinding<S>,
{
    /// Creates an idle worker for `source`.
    pub fn new(
        source: S,
        encoder: E,
        downloads: Arc<dyn DownloadTrigger>,
        config: SessionConfig,
        logger: EventLogger,
    ) -> Self {
        let source_id = source.id();
        Self {
            source,
            source_id,
            encoder,
            downloads,
            config,
            logger,
            state: WorkerState::Idle,
            live: None,
            draining: Vec::new(),
        }
    }

    /// Source this worker records.
    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Current recording state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// State of the live encoder, `Uninitialized` when none is bound.
    pub fn encoder_state(&self) -> EncoderState {
        self.live
            .as_ref()
            .map_or(EncoderState::Uninitialized, |cycle| cycle.encoder_state)
    }

    /// Cycle of the live encoder, if any.
    pub fn live_cycle(&self) -> Option<CycleId> {
        self.live.as_ref().map(|cycle| cycle.id)
    }

    /// Bytes accumulated by the live cycle.
    pub fn buffered_bytes(&self) -> usize {
        self.live.as_ref().map_or(0, Cycle::buffered_bytes)
    }

    /// Number of terminated cycles still waiting for their completion signal.
    pub fn draining_cycles(&self) -> usize {
        self.draining.len()
    }

    /// Starts or resumes recording.
    ///
    /// From `Idle` a new encoder is opened; it begins consuming right away when
    /// the source is playing, otherwise the worker waits `Armed` for `playing`.
    /// From `Paused` the encoder resumes. While `Recording` this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the binding's error if the encoder cannot be opened. The worker
    /// stays `Idle` and does not retry.
    #[track_caller]
    #[instrument(skip(self), fields(source_id = %self.source_id))]
    pub fn start(&mut self) -> CoreResult<WorkerState> {
        let ready = is_playing(&self.source.snapshot());
        self.apply(WorkerInput::Start { ready })
    }

    /// Finishes recording. The artifact is emitted once the encoder completes.
    #[track_caller]
    #[instrument(skip(self), fields(source_id = %self.source_id))]
    pub fn stop(&mut self) -> CoreResult<WorkerState> {
        self.apply(WorkerInput::Stop)
    }

    /// Suspends recording. Only has an effect while `Recording`.
    #[track_caller]
    #[instrument(skip(self), fields(source_id = %self.source_id))]
    pub fn pause(&mut self) -> CoreResult<WorkerState> {
        self.apply(WorkerInput::Pause)
    }

    /// Reacts to a lifecycle event reported by the source.
    #[track_caller]
    #[instrument(skip(self), fields(source_id = %self.source_id))]
    pub fn on_source_event(&mut self, event: SourceEvent) -> CoreResult<WorkerState> {
        self.apply(WorkerInput::Source(event))
    }

    /// Accepts a chunk or completion signal from the encoder binding.
    ///
    /// # Errors
    ///
    /// On completion, returns [`CaptureError::EmptyArtifact`] when the cycle
    /// produced no bytes, or the download collaborator's error. Either way the
    /// cycle is gone afterwards.
    #[track_caller]
    #[instrument(skip(self, event), fields(source_id = %self.source_id, cycle_id = %event.cycle()))]
    pub fn on_encoder_event(&mut self, event: EncoderEvent) -> CoreResult<()> {
        match event {
            EncoderEvent::Chunk { cycle, data } => {
                self.logger
                    .event(self.source_id, "Chunk received", &data.len());

                if data.is_empty() {
                    debug!("Discarding empty chunk");
                    return Ok(());
                }

                match self.cycle_mut(cycle) {
                    Some(target) => target.chunks.push(data),
                    None => warn!(chunk_len = data.len(), "Rejecting chunk for a finished cycle"),
                }
                Ok(())
            }
            EncoderEvent::Completed { cycle } => {
                if let Some(index) = self.draining.iter().position(|c| c.id == cycle) {
                    let finished = self.draining.remove(index);
                    return self.materialize(finished);
                }

                if self.live.as_ref().is_some_and(|c| c.id == cycle) {
                    warn!(state = %self.state, "Encoder completed without stop, treating as ended");
                    self.state = transition(self.state, WorkerInput::Source(SourceEvent::Ended)).next;
                    if let Some(finished) = self.live.take() {
                        return self.materialize(finished);
                    }
                }

                self.logger
                    .event(self.source_id, "Completion for unknown cycle ignored", &cycle);
                Ok(())
            }
        }
    }

    #[track_caller]
    fn apply(&mut self, input: WorkerInput) -> CoreResult<WorkerState> {
        let Transition { next, action } = transition(self.state, input);

        let message = match action {
            EncoderAction::None => {
                if let (WorkerInput::Start { .. }, WorkerState::Recording) = (input, self.state) {
                    "Already recording".to_string()
                } else {
                    format!("Ignored {} while {}", input, self.state)
                }
            }
            EncoderAction::Open { begin } => {
                let cycle_id = CycleId::new();
                let handle = self
                    .encoder
                    .open(&self.source, &self.config.encoder, cycle_id)
                    .inspect_err(|e| warn!(error = ?e, "Encoder open failed, staying idle"))?;

                let mut cycle = Cycle::new(cycle_id, handle);
                if begin {
                    self.encoder.begin_active(&mut cycle.handle);
                    cycle.encoder_state = EncoderState::Active;
                }
                debug!(cycle_id = %cycle_id, "Cycle opened");
                self.live = Some(cycle);

                if begin {
                    "Recording started".to_string()
                } else {
                    "Encoder armed, waiting for playback".to_string()
                }
            }
            EncoderAction::BeginActive => {
                self.with_live(|encoder, cycle| {
                    encoder.begin_active(&mut cycle.handle);
                    cycle.encoder_state = EncoderState::Active;
                });
                format!("Recording started on {}", input)
            }
            EncoderAction::Suspend => {
                self.with_live(|encoder, cycle| {
                    encoder.suspend(&mut cycle.handle);
                    cycle.encoder_state = EncoderState::Suspended;
                });
                format!("Recording paused on {}", input)
            }
            EncoderAction::Resume => {
                self.with_live(|encoder, cycle| {
                    encoder.resume(&mut cycle.handle);
                    cycle.encoder_state = EncoderState::Active;
                });
                format!("Recording resumed on {}", input)
            }
            EncoderAction::Terminate => {
                if let Some(mut cycle) = self.live.take() {
                    self.encoder.terminate(&mut cycle.handle);
                    cycle.encoder_state = EncoderState::Terminated;
                    debug!(cycle_id = %cycle.id, chunk_count = cycle.chunks.len(), "Cycle draining");
                    self.draining.push(cycle);
                }
                format!("Recording stopping on {}", input)
            }
        };

        // One sink message per handled input.
        self.logger.event(self.source_id, &message, &input);

        self.state = next;
        Ok(next)
    }

    fn with_live(&mut self, f: impl FnOnce(&mut E, &mut Cycle<E::Handle>)) {
        match self.live.as_mut() {
            Some(cycle) => f(&mut self.encoder, cycle),
            None => warn!(state = %self.state, "No live encoder for transition"),
        }
    }

    fn cycle_mut(&mut self, id: CycleId) -> Option<&mut Cycle<E::Handle>> {
        if let Some(live) = self.live.as_mut().filter(|c| c.id == id) {
            return Some(live);
        }
        self.draining.iter_mut().find(|c| c.id == id)
    }

    /// Assembles a finished cycle and hands it to the download collaborator.
    ///
    /// The cycle is already detached from the worker, so chunks arriving from
    /// here on cannot reach its buffer. Dropping it releases the encoder handle.
    #[track_caller]
    fn materialize(&self, cycle: Cycle<E::Handle>) -> CoreResult<()> {
        let Cycle { id, chunks, .. } = cycle;
        let chunk_count = chunks.len();
        let bytes = chunks.concat();

        if bytes.is_empty() {
            warn!(cycle_id = %id, "Nothing recorded, no artifact emitted");
            return Err(CaptureError::EmptyArtifact {
                source_id: self.source_id,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let artifact = Artifact {
            file_name: self.config.output_name.clone(),
            container_format: self.config.container_format.clone(),
            bytes,
        };
        let artifact_len = artifact.len();

        self.downloads
            .trigger(artifact)
            .inspect_err(|e| warn!(cycle_id = %id, error = ?e, "Download trigger failed"))?;

        debug!(
            cycle_id = %id,
            chunk_count,
            artifact_len,
            file_name = %self.config.output_name,
            "Artifact handed to download"
        );
        self.logger
            .event(self.source_id, "Artifact emitted", &artifact_len);

        Ok(())
    }
}
