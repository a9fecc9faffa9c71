mod artifact;
mod config;
mod encoder;
mod machine;
mod orchestrator;
mod source;
mod worker;

pub use {
    artifact::{Artifact, DownloadTrigger},
    config::{CaptureCadence, ContainerFormat, EncoderConfig, SessionConfig},
    encoder::{CycleId, EncoderBinding, EncoderEvent, EncoderState},
    machine::{EncoderAction, Transition, WorkerInput, WorkerState, transition},
    orchestrator::{Orchestrator, Worker},
    source::{
        MediaSource, PlaybackSnapshot, ReadyState, SourceDiscovery, SourceEvent, SourceId,
        is_playing,
    },
    worker::RecordingWorker,
};
