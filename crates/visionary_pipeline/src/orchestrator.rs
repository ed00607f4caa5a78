//! Sequential frame generation over a story.
//!
//! The orchestrator walks the segments of a story in order, calling the
//! image generator once per segment with the most recent successful images
//! as references, and publishes a full snapshot after every state change.

use crate::{ContextWindow, segment};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use visionary_core::{RunProgress, RunSnapshot, SegmentId, SegmentState, SegmentStatus};
use visionary_error::VisionaryResult;
use visionary_interface::ImageGenerator;

/// Message recorded on a segment whose generation failed.
///
/// The underlying error is logged, never shown to the reader.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to visualize this scene.";

/// Drives story runs against an image generator.
///
/// Each call to [`run_story`](Self::run_story) segments the text, creates one
/// `pending` state per segment and then processes segments strictly one at a
/// time. A failed segment is marked `error` and contributes nothing to the
/// context window; the run always continues to the end.
///
/// Every transition sends an immutable [`RunSnapshot`] on the channel
/// returned by [`new`](Self::new). The latest snapshot is also available from
/// [`snapshot`](Self::snapshot).
///
/// # Example
///
/// ```rust,ignore
/// use visionary_models::PlaceholderGenerator;
/// use visionary_pipeline::StoryPipeline;
///
/// let (mut pipeline, mut snapshots) = StoryPipeline::new(PlaceholderGenerator::new());
/// tokio::spawn(async move {
///     while let Some(snapshot) = snapshots.recv().await {
///         println!("{} Frames", snapshot.progress());
///     }
/// });
/// let finished = pipeline.run_story("A cat sat. It slept.").await?;
/// assert!(finished.is_finished());
/// ```
pub struct StoryPipeline<G: ImageGenerator> {
    generator: G,
    segments: Vec<SegmentState>,
    context: ContextWindow,
    progress: RunProgress,
    is_running: bool,
    snapshots: mpsc::UnboundedSender<RunSnapshot>,
}

impl<G: ImageGenerator> StoryPipeline<G> {
    /// Create an idle pipeline and the receiver its snapshots are sent to.
    ///
    /// Dropping the receiver is allowed; snapshots are then only available
    /// through [`snapshot`](Self::snapshot).
    pub fn new(generator: G) -> (Self, mpsc::UnboundedReceiver<RunSnapshot>) {
        let (snapshots, receiver) = mpsc::unbounded_channel();
        let pipeline = Self {
            generator,
            segments: Vec::new(),
            context: ContextWindow::new(),
            progress: RunProgress::default(),
            is_running: false,
            snapshots,
        };
        (pipeline, receiver)
    }

    /// Run a story to completion.
    ///
    /// Returns the final snapshot. Generator failures are contained in the
    /// affected segment and never surface here; an `Err` means a segment was
    /// driven through an illegal transition.
    pub async fn run_story(&mut self, text: &str) -> VisionaryResult<RunSnapshot> {
        self.run_story_with_cancel(text, &CancellationToken::new())
            .await
    }

    /// Run a story, checking `cancel` before each segment.
    ///
    /// A generation call already in flight is awaited. Segments not yet
    /// started when cancellation is observed stay `pending`, and the run is
    /// marked finished.
    #[instrument(
        skip(self, text, cancel),
        fields(
            provider = self.generator.provider_name(),
            model = %self.generator.model_name(),
            bytes = text.len()
        )
    )]
    pub async fn run_story_with_cancel(
        &mut self,
        text: &str,
        cancel: &CancellationToken,
    ) -> VisionaryResult<RunSnapshot> {
        let units = segment(text);
        let run_id = Uuid::new_v4();
        let total = units.len();

        self.segments = units
            .iter()
            .map(|unit| SegmentState::pending(SegmentId::new(*unit.index(), run_id), unit))
            .collect();
        self.context.clear();
        self.progress = RunProgress::new(0, total);
        self.is_running = true;

        info!(run = %run_id, segments = total, "Starting story run");
        self.emit();

        let mut outcome = Ok(());
        for position in 0..total {
            if cancel.is_cancelled() {
                warn!(
                    run = %run_id,
                    remaining = total - position,
                    "Story run cancelled, leaving remaining segments pending"
                );
                break;
            }
            if let Err(e) = self.process_segment(position).await {
                error!(run = %run_id, index = position, error = %e, "Story run aborted");
                outcome = Err(e);
                break;
            }
        }

        let snapshot = self.finish_run(outcome)?;
        info!(
            run = %run_id,
            completed = snapshot.count(SegmentStatus::Completed),
            failed = snapshot.count(SegmentStatus::Error),
            "Story run finished"
        );
        Ok(snapshot)
    }

    /// Mark the run over and emit the final snapshot, whatever the outcome.
    fn finish_run(&mut self, outcome: VisionaryResult<()>) -> VisionaryResult<RunSnapshot> {
        self.is_running = false;
        let snapshot = self.emit();
        outcome.map(|()| snapshot)
    }

    async fn process_segment(&mut self, position: usize) -> VisionaryResult<()> {
        let total = self.segments.len();
        let state = &mut self.segments[position];
        state.start()?;
        let segment_id = state.id().clone();
        let prompt = state.text().clone();

        self.progress = RunProgress::new(position + 1, total);
        self.emit();

        let references = self.context.images();
        debug!(
            segment = %segment_id,
            index = position,
            total,
            references = references.len(),
            "Generating frame"
        );

        match self.generator.generate(&prompt, &references).await {
            Ok(image) => {
                debug!(
                    segment = %segment_id,
                    mime = image.mime(),
                    bytes = image.len(),
                    "Frame generated"
                );
                self.segments[position].complete(image.clone())?;
                self.context.push(image);
            }
            Err(e) => {
                error!(
                    segment = %segment_id,
                    index = position,
                    error = %e,
                    "Frame generation failed, continuing with next segment"
                );
                self.segments[position].fail(GENERATION_FAILED_MESSAGE)?;
            }
        }

        self.emit();
        Ok(())
    }

    /// Discard the current run and return to the idle, empty state.
    ///
    /// Emits the empty snapshot. Calling it twice is the same as calling it
    /// once.
    pub fn reset(&mut self) {
        debug!(segments = self.segments.len(), "Resetting pipeline");
        self.segments.clear();
        self.context.clear();
        self.progress = RunProgress::default();
        self.is_running = false;
        self.emit();
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot::new(self.segments.clone(), self.progress, self.is_running)
    }

    /// Segment states of the current run, in story order.
    pub fn segments(&self) -> &[SegmentState] {
        &self.segments
    }

    /// Progress of the current run.
    pub fn progress(&self) -> RunProgress {
        self.progress
    }

    /// Whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Reference images the next generation call would receive.
    pub fn context_window(&self) -> &ContextWindow {
        &self.context
    }

    /// The image generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    fn emit(&self) -> RunSnapshot {
        let snapshot = self.snapshot();
        if self.snapshots.send(snapshot.clone()).is_err() {
            debug!("Snapshot receiver dropped");
        }
        snapshot
    }
}
