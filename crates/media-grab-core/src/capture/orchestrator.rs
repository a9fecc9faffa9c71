use crate::{
    CaptureError, CoreResult,
    capture::{EncoderBinding, MediaSource, RecordingWorker, SourceDiscovery, SourceId},
};

use std::panic::{AssertUnwindSafe, Location, catch_unwind};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Lifecycle surface the orchestrator fans out to.
///
/// Implemented by [`RecordingWorker`] for in-thread use and by host-side
/// mailboxes that forward commands to a worker running elsewhere.
pub trait Worker {
    /// Source the worker records.
    fn source_id(&self) -> SourceId;

    /// Starts (or resumes) recording.
    fn start(&mut self) -> CoreResult<()>;

    /// Stops recording.
    fn stop(&mut self) -> CoreResult<()>;
}

impl<S, E> Worker for RecordingWorker<S, E>
where
    S: MediaSource,
    E: EncoderBinding<S>,
{
    fn source_id(&self) -> SourceId {
        RecordingWorker::source_id(self)
    }

    fn start(&mut self) -> CoreResult<()> {
        RecordingWorker::start(self).map(|_| ())
    }

    fn stop(&mut self) -> CoreResult<()> {
        RecordingWorker::stop(self).map(|_| ())
    }
}

/// Owns one worker per discovered source and fans lifecycle commands out.
///
/// The registry is fixed at construction. Fan-out visits workers in discovery
/// order; a worker that fails or panics is logged and skipped, never stopping
/// the rest.
pub struct Orchestrator<W> {
    workers: Vec<W>,
}

impl<W: Worker> Orchestrator<W> {
    /// Discovers sources and builds one worker for each, keeping their order.
    ///
    /// Finding nothing yields an empty orchestrator.
    #[instrument(skip_all)]
    pub fn new<D, F>(discovery: &D, build: F) -> Self
    where
        D: SourceDiscovery,
        F: FnMut(D::Source) -> W,
    {
        let workers: Vec<W> = discovery.discover().into_iter().map(build).collect();

        if workers.is_empty() {
            info!("No media sources discovered");
        } else {
            info!(worker_count = workers.len(), "Orchestrator initialized");
        }

        Self { workers }
    }

    /// Number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether discovery found nothing.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Source ids in registry order.
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.workers.iter().map(Worker::source_id).collect()
    }

    /// Workers in registry order.
    pub fn workers(&self) -> impl Iterator<Item = &W> {
        self.workers.iter()
    }

    /// Worker bound to `source_id`, for routing lifecycle events.
    pub fn worker_mut(&mut self, source_id: SourceId) -> Option<&mut W> {
        self.workers
            .iter_mut()
            .find(|worker| worker.source_id() == source_id)
    }

    /// Consumes the orchestrator, returning its workers in registry order.
    pub fn into_workers(self) -> Vec<W> {
        self.workers
    }

    /// Calls `start()` on every worker. Returns the failures, in order.
    #[instrument(skip(self))]
    pub fn start_all(&mut self) -> Vec<CaptureError> {
        self.fan_out("start", |worker| worker.start())
    }

    /// Calls `stop()` on every worker. Returns the failures, in order.
    #[instrument(skip(self))]
    pub fn stop_all(&mut self) -> Vec<CaptureError> {
        self.fan_out("stop", |worker| worker.stop())
    }

    fn fan_out(
        &mut self,
        command: &'static str,
        mut call: impl FnMut(&mut W) -> CoreResult<()>,
    ) -> Vec<CaptureError> {
        let mut failures = Vec::new();

        for worker in &mut self.workers {
            let source_id = worker.source_id();

            let outcome = catch_unwind(AssertUnwindSafe(|| call(worker))).unwrap_or_else(|_| {
                Err(CaptureError::WorkerPanicked {
                    source_id,
                    location: ErrorLocation::from(Location::caller()),
                })
            });

            match outcome {
                Ok(()) => debug!(source_id = %source_id, command, "Worker accepted command"),
                Err(e) => {
                    error!(source_id = %source_id, command, error = ?e, "Worker failed");
                    failures.push(e);
                }
            }
        }

        failures
    }
}
