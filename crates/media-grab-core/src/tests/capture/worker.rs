use crate::{
    CaptureError, ContainerFormat, CycleId, EncoderState, SourceEvent, WorkerState,
    tests::support::{
        CapturingDownloads, EncoderCall, FakeEncoder, FakeSource, chunk, completed,
        playing_snapshot, worker,
    },
};

/// WHAT: start() on a playing source records immediately
/// WHY: Readiness is only consulted at start time
#[test]
#[allow(clippy::unwrap_used)]
fn given_playing_source_when_started_then_recording_with_active_encoder() {
    // Given: Worker over a playing source
    let encoder = FakeEncoder::default();
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), encoder.clone(), &downloads);

    // When: Starting
    let state = worker.start().unwrap();

    // Then: Recording with one opened-and-begun encoder
    let cycle = worker.live_cycle().unwrap();
    assert_eq!(state, WorkerState::Recording);
    assert_eq!(worker.encoder_state(), EncoderState::Active);
    assert_eq!(
        encoder.calls(),
        vec![EncoderCall::Open(cycle), EncoderCall::BeginActive(cycle)]
    );
}

/// WHAT: start() twice while recording opens one encoder
/// WHY: Duplicate sessions would split or double the output
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_started_again_then_single_encoder() {
    // Given: Recording worker
    let encoder = FakeEncoder::default();
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), encoder.clone(), &downloads);
    worker.start().unwrap();
    let cycle = worker.live_cycle();

    // When: start() again
    let state = worker.start().unwrap();

    // Then: Same cycle, no second open
    assert_eq!(state, WorkerState::Recording);
    assert_eq!(worker.live_cycle(), cycle);
    assert_eq!(encoder.open_count(), 1);
}

/// WHAT: Start, N chunks, stop yields one artifact with the chunks in order
/// WHY: Core round-trip of the recorder
#[test]
#[allow(clippy::unwrap_used)]
fn given_chunks_when_stopped_and_completed_then_single_concatenated_artifact() {
    // Given: Recording worker fed three chunks
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), FakeEncoder::default(), &downloads);
    worker.start().unwrap();
    let cycle = worker.live_cycle().unwrap();
    for data in [&b"ab"[..], b"cd", b"ef"] {
        worker.on_encoder_event(chunk(cycle, data)).unwrap();
    }
    assert_eq!(worker.buffered_bytes(), 6);

    // When: Stopping; the final chunk arrives before completion
    assert_eq!(worker.stop().unwrap(), WorkerState::Idle);
    assert!(downloads.artifacts().is_empty());
    worker.on_encoder_event(chunk(cycle, b"gh")).unwrap();
    worker.on_encoder_event(completed(cycle)).unwrap();

    // Then: Exactly one artifact, buffers released
    let artifacts = downloads.artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].bytes, b"abcdefgh".to_vec());
    assert_eq!(artifacts[0].file_name, "video.webm");
    assert_eq!(artifacts[0].container_format, ContainerFormat::default());
    assert_eq!(worker.buffered_bytes(), 0);
    assert_eq!(worker.draining_cycles(), 0);
    assert_eq!(worker.encoder_state(), EncoderState::Uninitialized);
}

/// WHAT: Zero-byte chunks are dropped
/// WHY: Encoders may emit empty chunks that carry no media
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_chunk_when_delivered_then_buffer_unchanged() {
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), FakeEncoder::default(), &downloads);
    worker.start().unwrap();
    let cycle = worker.live_cycle().unwrap();

    worker.on_encoder_event(chunk(cycle, b"")).unwrap();

    assert_eq!(worker.buffered_bytes(), 0);
}

/// WHAT: A source that never plays yields no artifact
/// WHY: Empty recordings must fail materialization, not download nothing
#[test]
#[allow(clippy::unwrap_used)]
fn given_never_ready_source_when_stopped_then_no_artifact_and_empty_artifact_error() {
    // Given: Worker armed on a stopped source
    let encoder = FakeEncoder::default();
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::stopped(1), encoder.clone(), &downloads);
    assert_eq!(worker.start().unwrap(), WorkerState::Armed);
    assert_eq!(worker.encoder_state(), EncoderState::Inactive);
    let cycle = worker.live_cycle().unwrap();

    // When: Stopping and the encoder completes
    assert_eq!(worker.stop().unwrap(), WorkerState::Idle);
    let result = worker.on_encoder_event(completed(cycle));

    // Then: Materialization fails, nothing downloaded, never begun
    assert!(matches!(result, Err(CaptureError::EmptyArtifact { .. })));
    assert!(downloads.artifacts().is_empty());
    assert_eq!(worker.state(), WorkerState::Idle);
    assert!(
        !encoder
            .calls()
            .iter()
            .any(|call| matches!(call, EncoderCall::BeginActive(_)))
    );
}

/// WHAT: Armed worker starts encoding on playing
/// WHY: Deferred start completes without another start()
#[test]
#[allow(clippy::unwrap_used)]
fn given_armed_when_source_plays_then_encoder_begins() {
    let encoder = FakeEncoder::default();
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::stopped(1), encoder.clone(), &downloads);
    worker.start().unwrap();
    let cycle = worker.live_cycle().unwrap();

    let state = worker.on_source_event(SourceEvent::Playing).unwrap();

    assert_eq!(state, WorkerState::Recording);
    assert_eq!(worker.encoder_state(), EncoderState::Active);
    assert_eq!(encoder.calls().last(), Some(&EncoderCall::BeginActive(cycle)));
}

/// WHAT: start() on an armed worker whose source became ready begins encoding
/// WHY: The caller's start() should not be lost if playing was missed
#[test]
#[allow(clippy::unwrap_used)]
fn given_armed_when_started_after_source_became_ready_then_recording() {
    let source = FakeSource::stopped(1);
    let downloads = CapturingDownloads::default();
    let encoder = FakeEncoder::default();
    let mut worker = worker(source.clone(), encoder.clone(), &downloads);
    worker.start().unwrap();

    source.set_snapshot(playing_snapshot());
    let state = worker.start().unwrap();

    assert_eq!(state, WorkerState::Recording);
    assert_eq!(encoder.open_count(), 1);
}

/// WHAT: Stall then playing then ended produces one artifact
/// WHY: Pauses must not split the recording into several files
#[test]
#[allow(clippy::unwrap_used)]
fn given_stall_and_recovery_when_ended_then_one_artifact_with_both_intervals() {
    // Given: Recording worker with a chunk from the first interval
    let encoder = FakeEncoder::default();
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), encoder.clone(), &downloads);
    worker.start().unwrap();
    let cycle = worker.live_cycle().unwrap();
    worker.on_encoder_event(chunk(cycle, b"first")).unwrap();

    // When: Stalled, no artifact yet
    assert_eq!(
        worker.on_source_event(SourceEvent::Stalled).unwrap(),
        WorkerState::Paused
    );
    assert!(downloads.artifacts().is_empty());

    // When: Playing again, second interval, then ended
    assert_eq!(
        worker.on_source_event(SourceEvent::Playing).unwrap(),
        WorkerState::Recording
    );
    worker.on_encoder_event(chunk(cycle, b"-second")).unwrap();
    assert_eq!(
        worker.on_source_event(SourceEvent::Ended).unwrap(),
        WorkerState::Idle
    );
    worker.on_encoder_event(completed(cycle)).unwrap();

    // Then: One artifact spanning both intervals
    let artifacts = downloads.artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].bytes, b"first-second".to_vec());
    assert_eq!(
        encoder.calls(),
        vec![
            EncoderCall::Open(cycle),
            EncoderCall::BeginActive(cycle),
            EncoderCall::Suspend(cycle),
            EncoderCall::Resume(cycle),
            EncoderCall::Terminate(cycle),
        ]
    );
}

/// WHAT: Chunks arriving after materialization are rejected
/// WHY: A flushed artifact must never be extended
#[test]
#[allow(clippy::unwrap_used)]
fn given_materialized_cycle_when_late_chunk_arrives_then_rejected() {
    // Given: A completed cycle, and a new recording cycle
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), FakeEncoder::default(), &downloads);
    worker.start().unwrap();
    let old = worker.live_cycle().unwrap();
    worker.on_encoder_event(chunk(old, b"old")).unwrap();
    worker.stop().unwrap();
    worker.on_encoder_event(completed(old)).unwrap();
    worker.start().unwrap();

    // When: A chunk tagged with the finished cycle shows up
    worker.on_encoder_event(chunk(old, b"late")).unwrap();

    // Then: Neither the emitted artifact nor the new cycle sees it
    assert_eq!(downloads.artifacts()[0].bytes, b"old".to_vec());
    assert_eq!(worker.buffered_bytes(), 0);
}

/// WHAT: Restarting while the previous cycle drains keeps buffers apart
/// WHY: Late chunks of the old encoder belong to the old artifact only
#[test]
#[allow(clippy::unwrap_used)]
fn given_draining_cycle_when_restarted_then_cycles_keep_separate_buffers() {
    // Given: Stopped cycle whose completion has not arrived
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), FakeEncoder::default(), &downloads);
    worker.start().unwrap();
    let first = worker.live_cycle().unwrap();
    worker.on_encoder_event(chunk(first, b"1a")).unwrap();
    worker.stop().unwrap();

    // When: Restarted, then interleaved deliveries from both encoders
    worker.start().unwrap();
    let second = worker.live_cycle().unwrap();
    assert_ne!(first, second);
    assert_eq!(worker.draining_cycles(), 1);
    worker.on_encoder_event(chunk(second, b"2a")).unwrap();
    worker.on_encoder_event(chunk(first, b"1b")).unwrap();
    worker.on_encoder_event(completed(first)).unwrap();

    // Then: First artifact holds only first-cycle chunks; second keeps recording
    let artifacts = downloads.artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].bytes, b"1a1b".to_vec());
    assert_eq!(worker.state(), WorkerState::Recording);
    assert_eq!(worker.buffered_bytes(), 2);
    assert_eq!(worker.draining_cycles(), 0);
}

/// WHAT: Completion without stop is treated as ended
/// WHY: Sources can vanish while recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_encoder_completes_unexpectedly_then_idle_and_artifact_emitted() {
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), FakeEncoder::default(), &downloads);
    worker.start().unwrap();
    let cycle = worker.live_cycle().unwrap();
    worker.on_encoder_event(chunk(cycle, b"data")).unwrap();

    worker.on_encoder_event(completed(cycle)).unwrap();

    assert_eq!(worker.state(), WorkerState::Idle);
    assert_eq!(worker.live_cycle(), None);
    assert_eq!(downloads.artifacts().len(), 1);
}

/// WHAT: Completion for a cycle the worker never opened is ignored
/// WHY: Stray signals must not end a live recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_unknown_cycle_completes_then_still_recording() {
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), FakeEncoder::default(), &downloads);
    worker.start().unwrap();

    worker.on_encoder_event(completed(CycleId::new())).unwrap();

    assert_eq!(worker.state(), WorkerState::Recording);
    assert!(downloads.artifacts().is_empty());
}

/// WHAT: Encoder open failure leaves the worker idle
/// WHY: Failure is reported once, without retry or half-open state
#[test]
fn given_uncapturable_source_when_started_then_open_error_and_idle() {
    let downloads = CapturingDownloads::default();
    let mut worker = worker(FakeSource::playing(1), FakeEncoder::failing(), &downloads);

    let result = worker.start();

    assert!(matches!(result, Err(CaptureError::EncoderOpenFailed { .. })));
    assert_eq!(worker.state(), WorkerState::Idle);
    assert_eq!(worker.encoder_state(), EncoderState::Uninitialized);
}

/// WHAT: Caller pause suspends a recording and a later start resumes it
/// WHY: pause() only has an effect while recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_paused_and_started_then_suspended_and_resumed() {
    // Given: Idle worker; pause is a no-op
    let downloads = CapturingDownloads::default();
    let encoder = FakeEncoder::default();
    let mut worker = worker(FakeSource::playing(1), encoder.clone(), &downloads);
    assert_eq!(worker.pause().unwrap(), WorkerState::Idle);
    assert!(encoder.calls().is_empty());

    // When: Recording, paused, started again
    worker.start().unwrap();
    let cycle = worker.live_cycle().unwrap();
    assert_eq!(worker.pause().unwrap(), WorkerState::Paused);
    assert_eq!(worker.encoder_state(), EncoderState::Suspended);
    assert_eq!(worker.start().unwrap(), WorkerState::Recording);

    // Then: Suspend and resume hit the same encoder
    assert_eq!(
        encoder.calls()[2..],
        [EncoderCall::Suspend(cycle), EncoderCall::Resume(cycle)]
    );
}

/// WHAT: Source removal while paused terminates the encoder
/// WHY: Removal is equivalent to ended
#[test]
#[allow(clippy::unwrap_used)]
fn given_paused_when_source_removed_then_terminated() {
    let downloads = CapturingDownloads::default();
    let encoder = FakeEncoder::default();
    let mut worker = worker(FakeSource::playing(1), encoder.clone(), &downloads);
    worker.start().unwrap();
    let cycle = worker.live_cycle().unwrap();
    worker.on_source_event(SourceEvent::Pause).unwrap();

    let state = worker.on_source_event(SourceEvent::Removed).unwrap();

    assert_eq!(state, WorkerState::Idle);
    assert_eq!(encoder.calls().last(), Some(&EncoderCall::Terminate(cycle)));
    assert_eq!(worker.draining_cycles(), 1);
}

/// WHAT: stop() while idle does nothing
/// WHY: Idempotent stop
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_when_stopped_then_noop() {
    let downloads = CapturingDownloads::default();
    let encoder = FakeEncoder::default();
    let mut worker = worker(FakeSource::playing(1), encoder.clone(), &downloads);

    assert_eq!(worker.stop().unwrap(), WorkerState::Idle);
    assert!(encoder.calls().is_empty());
    assert_eq!(worker.draining_cycles(), 0);
}
