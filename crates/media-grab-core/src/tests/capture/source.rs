use crate::{
    PlaybackSnapshot, ReadyState, SourceEvent, SourceId, is_playing,
    tests::support::playing_snapshot,
};

/// WHAT: Advancing, unpaused, buffered source counts as playing
/// WHY: This is the only case where start() records immediately
#[test]
fn given_advancing_source_when_checking_then_playing() {
    assert!(is_playing(&playing_snapshot()));
}

/// WHAT: Any single failing condition means not playing
/// WHY: Recording a paused, ended, unstarted or starved source yields garbage
#[test]
fn given_one_condition_unmet_when_checking_then_not_playing() {
    // Given: Variants of a playing snapshot with one attribute flipped
    let base = playing_snapshot();
    let cases = [
        PlaybackSnapshot {
            position_secs: 0.0,
            ..base
        },
        PlaybackSnapshot {
            paused: true,
            ..base
        },
        PlaybackSnapshot { ended: true, ..base },
        PlaybackSnapshot {
            ready_state: ReadyState::HaveCurrentData,
            ..base
        },
        PlaybackSnapshot {
            ready_state: ReadyState::HaveNothing,
            ..base
        },
    ];

    // When/Then: None of them is playing
    for snapshot in cases {
        assert!(!is_playing(&snapshot), "{snapshot:?}");
    }
}

/// WHAT: Future data is enough buffering
/// WHY: Threshold is strictly above current-frame-only readiness
#[test]
fn given_future_data_when_checking_then_playing() {
    let snapshot = PlaybackSnapshot {
        ready_state: ReadyState::HaveFutureData,
        ..playing_snapshot()
    };

    assert!(is_playing(&snapshot));
}

/// WHAT: Ids and events render for logs
/// WHY: Log lines are the only failure channel
#[test]
fn given_id_and_event_when_formatting_then_readable() {
    assert_eq!(SourceId(4).to_string(), "#4");
    assert_eq!(SourceEvent::Stalled.to_string(), "stalled");
}
