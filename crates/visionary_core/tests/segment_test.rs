use strum::IntoEnumIterator;
use visionary_core::{
    Image, RunProgress, RunSnapshot, SegmentId, SegmentState, SegmentStatus, TextUnit,
};
use visionary_error::{PipelineErrorKind, VisionaryErrorKind};

fn pending(index: usize, text: &str) -> SegmentState {
    SegmentState::pending(SegmentId::new(index, "test"), &TextUnit::new(index, text))
}

#[test]
fn test_pending_state_copies_unit() {
    let state = pending(2, "It slept.");
    assert_eq!(state.id().as_str(), "seg-2-test");
    assert_eq!(*state.index(), 2);
    assert_eq!(state.text(), "It slept.");
    assert_eq!(*state.status(), SegmentStatus::Pending);
    assert!(state.image().is_none());
    assert!(state.error_message().is_none());
}

#[test]
fn test_failure_sets_message_only() {
    let mut state = pending(0, "A cat sat.");
    state.start().expect("pending -> processing");
    state.fail("Failed to visualize this scene.").expect("processing -> error");

    assert_eq!(*state.status(), SegmentStatus::Error);
    assert!(state.image().is_none());
    assert_eq!(
        state.error_message().as_deref(),
        Some("Failed to visualize this scene.")
    );
}

#[test]
fn test_cannot_skip_processing() {
    let mut state = pending(0, "A cat sat.");
    let err = state
        .complete(Image::new("image/png", vec![1]))
        .expect_err("pending -> completed is illegal");

    match err.kind() {
        VisionaryErrorKind::Pipeline(e) => match &e.kind {
            PipelineErrorKind::InvalidTransition { from, to, .. } => {
                assert_eq!(from, "pending");
                assert_eq!(to, "completed");
            }
            other => panic!("unexpected kind: {other}"),
        },
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*state.status(), SegmentStatus::Pending);
    assert!(state.image().is_none());
}

#[test]
fn test_terminal_states_are_final() {
    let mut state = pending(0, "A cat sat.");
    state.start().unwrap();
    state.complete(Image::new("image/png", vec![1])).unwrap();

    assert!(state.start().is_err());
    assert!(state.fail("late").is_err());
    assert!(state.error_message().is_none());
}

#[test]
fn test_only_completed_and_error_are_terminal() {
    let terminal: Vec<_> = SegmentStatus::iter().filter(|s| s.is_terminal()).collect();
    assert_eq!(terminal, vec![SegmentStatus::Completed, SegmentStatus::Error]);
}

#[test]
fn test_snapshot_json_shape() {
    let mut done = pending(0, "A cat sat.");
    done.start().unwrap();
    done.complete(Image::new("image/png", vec![1, 2, 3])).unwrap();
    let mut failed = pending(1, "It slept.");
    failed.start().unwrap();
    failed.fail("Failed to visualize this scene.").unwrap();

    let snapshot = RunSnapshot::new(vec![done, failed], RunProgress::new(2, 2), false);
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["isRunning"], false);
    assert_eq!(json["progress"]["current"], 2);
    assert_eq!(json["segments"][0]["status"], "completed");
    assert_eq!(json["segments"][0]["image"], "data:image/png;base64,AQID");
    assert!(json["segments"][0].get("errorMessage").is_none());
    assert_eq!(json["segments"][1]["status"], "error");
    assert_eq!(
        json["segments"][1]["errorMessage"],
        "Failed to visualize this scene."
    );
    assert!(snapshot.is_finished());
    assert_eq!(snapshot.count(SegmentStatus::Completed), 1);
    assert_eq!(snapshot.count(SegmentStatus::Error), 1);
}
