use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use visionary_core::{Image, RunSnapshot, SegmentStatus};
use visionary_error::{HttpError, VisionaryResult};
use visionary_interface::ImageGenerator;
use visionary_pipeline::{
    CancellationToken, GENERATION_FAILED_MESSAGE, MAX_REFERENCE_IMAGES, StoryPipeline,
};

/// Records every call and fails the calls whose (0-based) number is listed.
struct ScriptedGenerator {
    fail_calls: HashSet<usize>,
    calls: Mutex<Vec<(String, Vec<Image>)>>,
    in_flight: AtomicBool,
    cancel_after_first: Option<CancellationToken>,
}

impl ScriptedGenerator {
    fn new() -> Self {
        Self {
            fail_calls: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
            cancel_after_first: None,
        }
    }

    fn failing(calls: &[usize]) -> Self {
        Self {
            fail_calls: calls.iter().copied().collect(),
            ..Self::new()
        }
    }

    fn calls(&self) -> Vec<(String, Vec<Image>)> {
        self.calls.lock().unwrap().clone()
    }
}

fn image_for(prompt: &str) -> Image {
    Image::new("image/png", prompt.as_bytes().to_vec())
}

#[async_trait]
impl ImageGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, references: &[Image]) -> VisionaryResult<Image> {
        assert!(
            !self.in_flight.swap(true, Ordering::SeqCst),
            "generator called while another call was in flight"
        );
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((prompt.to_string(), references.to_vec()));
            calls.len() - 1
        };

        tokio::task::yield_now().await;

        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }
        self.in_flight.store(false, Ordering::SeqCst);

        if self.fail_calls.contains(&call_number) {
            return Err(HttpError::new("upstream exploded with secret details").into());
        }
        Ok(image_for(prompt))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-v1"
    }
}

fn drain(receiver: &mut mpsc::UnboundedReceiver<RunSnapshot>) -> Vec<RunSnapshot> {
    let mut snapshots = Vec::new();
    while let Ok(snapshot) = receiver.try_recv() {
        snapshots.push(snapshot);
    }
    snapshots
}

fn statuses(snapshot: &RunSnapshot) -> Vec<SegmentStatus> {
    snapshot.segments().iter().map(|s| *s.status()).collect()
}

#[tokio::test]
async fn test_two_sentence_story_succeeds() {
    let (mut pipeline, mut receiver) = StoryPipeline::new(ScriptedGenerator::new());

    let finished = pipeline.run_story("A cat sat. It slept.").await.unwrap();

    let calls = pipeline.generator().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "A cat sat.");
    assert!(calls[0].1.is_empty());
    assert_eq!(calls[1].0, "It slept.");
    assert_eq!(calls[1].1, vec![image_for("A cat sat.")]);

    assert_eq!(
        statuses(&finished),
        [SegmentStatus::Completed, SegmentStatus::Completed]
    );
    let first = finished.segments()[0].image().clone().unwrap();
    let second = finished.segments()[1].image().clone().unwrap();
    assert_ne!(first, second);
    assert_eq!(*finished.progress().current(), 2);
    assert_eq!(*finished.progress().total(), 2);
    assert!(!finished.is_running());
    assert!(finished.is_finished());

    let snapshots = drain(&mut receiver);
    assert_eq!(snapshots.last(), Some(&finished));
}

#[tokio::test]
async fn test_failure_is_contained_to_its_segment() {
    let (mut pipeline, _receiver) = StoryPipeline::new(ScriptedGenerator::failing(&[1]));

    let finished = pipeline.run_story("A cat sat. It slept.").await.unwrap();

    assert_eq!(
        statuses(&finished),
        [SegmentStatus::Completed, SegmentStatus::Error]
    );
    let failed = &finished.segments()[1];
    assert_eq!(failed.error_message().as_deref(), Some(GENERATION_FAILED_MESSAGE));
    assert!(failed.image().is_none());
    assert!(
        !failed
            .error_message()
            .as_deref()
            .unwrap_or_default()
            .contains("secret")
    );
    assert_eq!(finished.progress().to_string(), "2 / 2");
}

#[tokio::test]
async fn test_failed_segment_adds_nothing_to_context() {
    let (mut pipeline, _receiver) = StoryPipeline::new(ScriptedGenerator::failing(&[1]));

    let finished = pipeline
        .run_story("One. Two. Three. Four.")
        .await
        .unwrap();

    let calls = pipeline.generator().calls();
    assert_eq!(calls[1].1, vec![image_for("One.")]);
    // "Two." failed, so "Three." sees only "One.".
    assert_eq!(calls[2].1, vec![image_for("One.")]);
    assert_eq!(calls[3].1, vec![image_for("One."), image_for("Three.")]);

    assert_eq!(
        statuses(&finished),
        [
            SegmentStatus::Completed,
            SegmentStatus::Error,
            SegmentStatus::Completed,
            SegmentStatus::Completed,
        ]
    );
}

#[tokio::test]
async fn test_earlier_segments_unchanged_after_failure() {
    let (mut pipeline, mut receiver) = StoryPipeline::new(ScriptedGenerator::failing(&[2]));

    pipeline.run_story("One. Two. Three. Four.").await.unwrap();

    let snapshots = drain(&mut receiver);
    let before_failure = snapshots
        .iter()
        .find(|s| *s.segments()[2].status() == SegmentStatus::Processing)
        .unwrap()
        .clone();
    let last = snapshots.last().unwrap();

    assert_eq!(before_failure.segments()[0], last.segments()[0]);
    assert_eq!(before_failure.segments()[1], last.segments()[1]);
    assert_eq!(*last.segments()[3].status(), SegmentStatus::Completed);
}

#[tokio::test]
async fn test_context_window_is_bounded_and_in_recency_order() {
    let (mut pipeline, _receiver) = StoryPipeline::new(ScriptedGenerator::new());

    pipeline
        .run_story("One. Two. Three. Four. Five.")
        .await
        .unwrap();

    let calls = pipeline.generator().calls();
    let prompts: Vec<&str> = calls.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(prompts, ["One.", "Two.", "Three.", "Four.", "Five."]);

    for (prompt, references) in &calls {
        assert!(
            references.len() <= MAX_REFERENCE_IMAGES,
            "{prompt} got {} references",
            references.len()
        );
    }
    assert_eq!(calls[4].1, vec![image_for("Three."), image_for("Four.")]);
    assert_eq!(
        pipeline.context_window().images(),
        vec![image_for("Four."), image_for("Five.")]
    );
}

#[tokio::test]
async fn test_snapshot_sequence_follows_state_machine() {
    let (mut pipeline, mut receiver) = StoryPipeline::new(ScriptedGenerator::failing(&[1]));

    pipeline.run_story("A cat sat. It slept.").await.unwrap();
    let snapshots = drain(&mut receiver);

    use SegmentStatus::*;
    let observed: Vec<(Vec<SegmentStatus>, usize, bool)> = snapshots
        .iter()
        .map(|s| (statuses(s), *s.progress().current(), *s.is_running()))
        .collect();

    assert_eq!(
        observed,
        vec![
            (vec![Pending, Pending], 0, true),
            (vec![Processing, Pending], 1, true),
            (vec![Completed, Pending], 1, true),
            (vec![Completed, Processing], 2, true),
            (vec![Completed, Error], 2, true),
            (vec![Completed, Error], 2, false),
        ]
    );
    for snapshot in &snapshots {
        assert_eq!(snapshot.segments().len(), 2);
        assert_eq!(*snapshot.progress().total(), 2);
    }
}

#[tokio::test]
async fn test_every_call_failing_still_finishes() {
    let (mut pipeline, _receiver) = StoryPipeline::new(ScriptedGenerator::failing(&[0, 1, 2]));

    let finished = pipeline.run_story("One. Two. Three.").await.unwrap();

    assert!(
        finished
            .segments()
            .iter()
            .all(|s| *s.status() == SegmentStatus::Error)
    );
    for (_, references) in pipeline.generator().calls() {
        assert!(references.is_empty());
    }
    assert!(pipeline.context_window().is_empty());
    assert!(finished.progress().is_complete());
}

#[tokio::test]
async fn test_blank_story_completes_immediately() {
    let (mut pipeline, mut receiver) = StoryPipeline::new(ScriptedGenerator::new());

    let finished = pipeline.run_story("   \n\t ").await.unwrap();

    assert!(pipeline.generator().calls().is_empty());
    assert!(finished.segments().is_empty());
    assert_eq!(*finished.progress().total(), 0);
    assert!(finished.is_finished());

    let snapshots = drain(&mut receiver);
    assert_eq!(snapshots.len(), 2);
    assert!(*snapshots[0].is_running());
    assert!(!*snapshots[1].is_running());
}

#[tokio::test]
async fn test_new_run_starts_fresh() {
    let (mut pipeline, _receiver) = StoryPipeline::new(ScriptedGenerator::new());

    let first = pipeline.run_story("A cat sat. It slept.").await.unwrap();
    let second = pipeline.run_story("A dog barked.").await.unwrap();

    assert_eq!(second.segments().len(), 1);
    assert_ne!(first.segments()[0].id(), second.segments()[0].id());
    // The second story does not inherit the first story's images.
    let calls = pipeline.generator().calls();
    assert_eq!(calls[2].0, "A dog barked.");
    assert!(calls[2].1.is_empty());
}

#[tokio::test]
async fn test_segment_ids_are_unique_within_run() {
    let (mut pipeline, _receiver) = StoryPipeline::new(ScriptedGenerator::new());

    let finished = pipeline.run_story("Same. Same. Same.").await.unwrap();

    let ids: HashSet<_> = finished.segments().iter().map(|s| s.id().clone()).collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_reset_is_idempotent() {
    let (mut pipeline, mut receiver) = StoryPipeline::new(ScriptedGenerator::new());
    pipeline.run_story("A cat sat. It slept.").await.unwrap();
    drain(&mut receiver);

    pipeline.reset();
    let once = pipeline.snapshot();
    pipeline.reset();
    let twice = pipeline.snapshot();

    assert_eq!(once, twice);
    assert_eq!(once, RunSnapshot::default());
    assert!(pipeline.segments().is_empty());
    assert!(pipeline.context_window().is_empty());
    assert!(!pipeline.is_running());

    let emitted = drain(&mut receiver);
    assert_eq!(emitted, vec![RunSnapshot::default(), RunSnapshot::default()]);
}

#[tokio::test]
async fn test_reset_on_idle_pipeline() {
    let (mut pipeline, _receiver) = StoryPipeline::new(ScriptedGenerator::new());
    pipeline.reset();
    assert_eq!(pipeline.snapshot(), RunSnapshot::default());
}

#[tokio::test]
async fn test_dropped_receiver_does_not_stop_run() {
    let (mut pipeline, receiver) = StoryPipeline::new(ScriptedGenerator::new());
    drop(receiver);

    let finished = pipeline.run_story("A cat sat. It slept.").await.unwrap();
    assert_eq!(finished.count(SegmentStatus::Completed), 2);
}

#[tokio::test]
async fn test_cancellation_leaves_remaining_segments_pending() {
    let cancel = CancellationToken::new();
    let generator = ScriptedGenerator {
        cancel_after_first: Some(cancel.clone()),
        ..ScriptedGenerator::new()
    };
    let (mut pipeline, _receiver) = StoryPipeline::new(generator);

    let finished = pipeline
        .run_story_with_cancel("One. Two. Three.", &cancel)
        .await
        .unwrap();

    assert_eq!(pipeline.generator().calls().len(), 1);
    assert_eq!(
        statuses(&finished),
        [
            SegmentStatus::Completed,
            SegmentStatus::Pending,
            SegmentStatus::Pending
        ]
    );
    assert!(!finished.is_running());
    assert!(!finished.is_finished());
    assert_eq!(finished.progress().to_string(), "1 / 3");
}
