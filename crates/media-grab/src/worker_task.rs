//! Thread-confined recording workers.
//!
//! Each [`RecordingWorker`] lives on its own blocking task and is reached only
//! through an unbounded mpsc inbox. Commands, source events and encoder output
//! share that inbox, so the worker sees them strictly in arrival order.

use crate::{HostError, HostResult};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use media_grab_core::{
    CaptureError, CoreResult, DownloadTrigger, EncoderBinding, EncoderEvent, EventLogger,
    MediaSource, RecordingWorker, SessionConfig, SourceEvent, SourceId, Worker, WorkerState,
};
use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info, instrument, warn};

/// How long `shutdown` waits for a worker thread to drain its inbox.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a shutting-down worker waits for draining cycles to complete.
/// Kept below `SHUTDOWN_TIMEOUT` so the join still succeeds afterwards.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything a worker thread can receive.
#[derive(Debug)]
pub enum WorkerMessage {
    /// Caller asked to start or resume.
    Start,
    /// Caller asked to stop.
    Stop,
    /// Caller asked to pause.
    Pause,
    /// Lifecycle event reported by the source.
    Source(SourceEvent),
    /// Output of the worker's encoder.
    Encoder(EncoderEvent),
    /// Leave the loop once everything queued before has been handled.
    Shutdown,
}

/// Handed to encoder bindings so they can deliver chunks and completions.
///
/// `deliver` never blocks and may be called from any thread.
#[derive(Debug, Clone)]
pub struct EncoderEventSender {
    source_id: SourceId,
    tx: mpsc::UnboundedSender<WorkerMessage>,
}

impl EncoderEventSender {
    /// Source whose worker receives the events.
    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Queue an encoder event for the worker.
    #[track_caller]
    pub fn deliver(&self, event: EncoderEvent) -> CoreResult<()> {
        send(&self.tx, self.source_id, WorkerMessage::Encoder(event))
    }
}

/// Host-side handle of a worker thread.
pub struct WorkerMailbox {
    source_id: SourceId,
    tx: mpsc::UnboundedSender<WorkerMessage>,
    state_rx: watch::Receiver<WorkerState>,
    handle: JoinHandle<()>,
}

#[track_caller]
fn send(
    tx: &mpsc::UnboundedSender<WorkerMessage>,
    source_id: SourceId,
    message: WorkerMessage,
) -> CoreResult<()> {
    tx.send(message).map_err(|_| CaptureError::WorkerUnavailable {
        source_id,
        reason: "worker inbox closed".to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Spawn a worker for `source` on its own blocking task.
///
/// `build_encoder` receives the sender the encoder must deliver its output to.
/// Must be called from within a tokio runtime.
#[instrument(skip_all, fields(source_id = %source.id()))]
pub fn spawn_worker<S, E, B>(
    source: S,
    build_encoder: B,
    downloads: Arc<dyn DownloadTrigger>,
    config: SessionConfig,
    logger: EventLogger,
) -> WorkerMailbox
where
    S: MediaSource + Send + 'static,
    E: EncoderBinding<S> + Send + 'static,
    E::Handle: Send + 'static,
    B: FnOnce(&S, EncoderEventSender) -> E,
{
    let source_id = source.id();
    let (tx, rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(WorkerState::Idle);

    let encoder = build_encoder(
        &source,
        EncoderEventSender {
            source_id,
            tx: tx.clone(),
        },
    );
    let worker = RecordingWorker::new(source, encoder, downloads, config, logger);
    let runtime = Handle::current();

    // One persistent blocking task per worker: state never leaves this thread
    // and blocking download I/O does not stall the async runtime.
    let handle = tokio::task::spawn_blocking(move || run(worker, rx, state_tx, runtime));

    debug!("Worker thread spawned");

    WorkerMailbox {
        source_id,
        tx,
        state_rx,
        handle,
    }
}

fn run<S, E>(
    mut worker: RecordingWorker<S, E>,
    mut inbox: mpsc::UnboundedReceiver<WorkerMessage>,
    state_tx: watch::Sender<WorkerState>,
    runtime: Handle,
) where
    S: MediaSource,
    E: EncoderBinding<S>,
{
    let source_id = worker.source_id();

    while let Some(message) = inbox.blocking_recv() {
        let result = match message {
            WorkerMessage::Start => worker.start().map(|_| ()),
            WorkerMessage::Stop => worker.stop().map(|_| ()),
            WorkerMessage::Pause => worker.pause().map(|_| ()),
            WorkerMessage::Source(event) => worker.on_source_event(event).map(|_| ()),
            WorkerMessage::Encoder(event) => worker.on_encoder_event(event),
            WorkerMessage::Shutdown => {
                drain_pending(&mut worker, &mut inbox, &runtime);
                state_tx.send_replace(worker.state());
                break;
            }
        };

        if let Err(e) = result {
            // Already logged by the worker where the failure occurred.
            debug!(source_id = %source_id, error = ?e, "Worker message failed");
        }

        state_tx.send_replace(worker.state());
    }

    if worker.draining_cycles() > 0 || worker.state() != WorkerState::Idle {
        warn!(
            source_id = %source_id,
            state = %worker.state(),
            draining = worker.draining_cycles(),
            "Worker shut down with an unfinished recording"
        );
    }
    info!(source_id = %source_id, "Worker stopped");
}

/// Wait for the completion of every draining cycle, so a stop issued before
/// shutdown still produces its artifact. Encoders complete asynchronously, so
/// this blocks on the inbox until `DRAIN_TIMEOUT`. Commands queued after the
/// shutdown request are dropped.
fn drain_pending<S, E>(
    worker: &mut RecordingWorker<S, E>,
    inbox: &mut mpsc::UnboundedReceiver<WorkerMessage>,
    runtime: &Handle,
) where
    S: MediaSource,
    E: EncoderBinding<S>,
{
    let deadline = Instant::now() + DRAIN_TIMEOUT;

    while worker.draining_cycles() > 0 {
        match runtime.block_on(tokio::time::timeout_at(deadline, inbox.recv())) {
            Ok(Some(WorkerMessage::Encoder(event))) => {
                if let Err(e) = worker.on_encoder_event(event) {
                    debug!(source_id = %worker.source_id(), error = ?e, "Worker message failed");
                }
            }
            Ok(Some(message)) => {
                debug!(source_id = %worker.source_id(), message = ?message, "Ignoring message after shutdown");
            }
            Ok(None) => break,
            Err(_) => {
                warn!(
                    source_id = %worker.source_id(),
                    draining = worker.draining_cycles(),
                    timeout = ?DRAIN_TIMEOUT,
                    "Encoder did not complete before shutdown"
                );
                break;
            }
        }
    }
}

impl WorkerMailbox {
    /// State after the most recently handled message.
    pub fn state(&self) -> WorkerState {
        *self.state_rx.borrow()
    }

    /// Receiver that observes every state the worker settles in.
    pub fn watch_state(&self) -> watch::Receiver<WorkerState> {
        self.state_rx.clone()
    }

    /// Queue a caller pause.
    #[track_caller]
    pub fn pause(&self) -> CoreResult<()> {
        send(&self.tx, self.source_id, WorkerMessage::Pause)
    }

    /// Queue a source lifecycle event.
    #[track_caller]
    pub fn source_event(&self, event: SourceEvent) -> CoreResult<()> {
        send(&self.tx, self.source_id, WorkerMessage::Source(event))
    }

    /// Sender for encoder output, equivalent to the one given to the encoder.
    pub fn encoder_events(&self) -> EncoderEventSender {
        EncoderEventSender {
            source_id: self.source_id,
            tx: self.tx.clone(),
        }
    }

    /// Let the worker drain its inbox, then join its thread.
    ///
    /// Messages queued before this call are still handled. Recordings already
    /// stopping are given up to 3 seconds for their encoder to complete, so
    /// `stop` followed by `shutdown` still saves the artifact.
    #[instrument(skip(self), fields(source_id = %self.source_id))]
    pub async fn shutdown(self) -> HostResult<()> {
        // The worker may already be gone; joining below reports that.
        let _ = self.tx.send(WorkerMessage::Shutdown);

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, self.handle).await {
            Ok(Ok(())) => {
                debug!("Worker thread joined");
                Ok(())
            }
            Ok(Err(e)) => Err(HostError::WorkerJoinFailed {
                source_id: self.source_id,
                reason: format!("Worker thread panicked: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(_) => Err(HostError::WorkerJoinFailed {
                source_id: self.source_id,
                reason: format!("Worker did not stop within {:?}", SHUTDOWN_TIMEOUT),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl Worker for WorkerMailbox {
    fn source_id(&self) -> SourceId {
        self.source_id
    }

    fn start(&mut self) -> CoreResult<()> {
        send(&self.tx, self.source_id, WorkerMessage::Start)
    }

    fn stop(&mut self) -> CoreResult<()> {
        send(&self.tx, self.source_id, WorkerMessage::Stop)
    }
}
