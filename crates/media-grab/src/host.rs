use crate::{
    EncoderEventSender, FileDownloader, HostError, HostResult, WorkerMailbox, config::Config,
    spawn_worker,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use media_grab_core::{
    CaptureError, DownloadTrigger, EncoderBinding, EventLogger, Orchestrator, SourceDiscovery,
    SourceEvent, SourceId, Worker, WorkerState,
};
use tracing::{error, info, instrument};

/// Runs one thread-confined worker per discovered source.
///
/// Built from a [`Config`]: sessions use the `capture` section, artifacts go
/// to the `download` directory, lifecycle logging uses the `logging` level.
/// Commands are fire-and-forget; each worker settles on its own thread.
pub struct CaptureHost {
    orchestrator: Orchestrator<WorkerMailbox>,
    downloads: Arc<FileDownloader>,
}

impl CaptureHost {
    /// Discover sources and spawn a worker for each.
    ///
    /// `encoders` builds the encoder binding of every source; it receives the
    /// sender that binding must deliver chunks and completions to. Must be
    /// called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the download directory
    /// cannot be created. Finding no sources is not an error.
    #[track_caller]
    #[instrument(skip_all)]
    pub fn new<D, E, F>(config: &Config, discovery: &D, mut encoders: F) -> HostResult<Self>
    where
        D: SourceDiscovery,
        D::Source: Send + 'static,
        E: EncoderBinding<D::Source> + Send + 'static,
        E::Handle: Send + 'static,
        F: FnMut(&D::Source, EncoderEventSender) -> E,
    {
        config.validate()?;

        let session = config.capture.session_config()?;
        let logger = EventLogger::new(config.logging.level);
        let downloads = Arc::new(FileDownloader::new(&config.download.output_dir)?);

        let orchestrator = Orchestrator::new(discovery, |source| {
            spawn_worker(
                source,
                |source, events| encoders(source, events),
                Arc::clone(&downloads) as Arc<dyn DownloadTrigger>,
                session.clone(),
                logger,
            )
        });

        info!(
            worker_count = orchestrator.len(),
            output_dir = ?downloads.output_dir(),
            "CaptureHost initialized"
        );

        Ok(Self {
            orchestrator,
            downloads,
        })
    }

    /// Number of workers.
    pub fn len(&self) -> usize {
        self.orchestrator.len()
    }

    /// Whether no sources were discovered.
    pub fn is_empty(&self) -> bool {
        self.orchestrator.is_empty()
    }

    /// Source ids in discovery order.
    pub fn source_ids(&self) -> Vec<SourceId> {
        self.orchestrator.source_ids()
    }

    /// Download trigger shared by the workers.
    pub fn downloads(&self) -> &FileDownloader {
        &self.downloads
    }

    /// Mailbox of the worker for `source_id`.
    pub fn mailbox(&self, source_id: SourceId) -> Option<&WorkerMailbox> {
        self.orchestrator
            .workers()
            .find(|mailbox| mailbox.source_id() == source_id)
    }

    /// Last settled state of every worker, in discovery order.
    pub fn states(&self) -> Vec<(SourceId, WorkerState)> {
        self.orchestrator
            .workers()
            .map(|mailbox| (mailbox.source_id(), mailbox.state()))
            .collect()
    }

    /// Ask every worker to start. Returns workers that could not be reached.
    #[instrument(skip(self))]
    pub fn start_all(&mut self) -> Vec<CaptureError> {
        self.orchestrator.start_all()
    }

    /// Ask every worker to stop. Returns workers that could not be reached.
    #[instrument(skip(self))]
    pub fn stop_all(&mut self) -> Vec<CaptureError> {
        self.orchestrator.stop_all()
    }

    /// Ask one worker to pause.
    #[track_caller]
    pub fn pause(&self, source_id: SourceId) -> HostResult<()> {
        Ok(self.require(source_id)?.pause()?)
    }

    /// Route a source lifecycle event to its worker.
    #[track_caller]
    pub fn source_event(&self, source_id: SourceId, event: SourceEvent) -> HostResult<()> {
        Ok(self.require(source_id)?.source_event(event)?)
    }

    /// Drain and join every worker thread.
    ///
    /// Every worker is joined even if an earlier one fails; the first failure
    /// is returned.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> HostResult<()> {
        let mut first_error = None;

        for mailbox in self.orchestrator.into_workers() {
            if let Err(e) = mailbox.shutdown().await {
                error!(error = ?e, "Worker shutdown failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        info!("CaptureHost shut down");

        first_error.map_or(Ok(()), Err)
    }

    #[track_caller]
    fn require(&self, source_id: SourceId) -> HostResult<&WorkerMailbox> {
        self.mailbox(source_id).ok_or_else(|| HostError::UnknownSource {
            source_id,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
