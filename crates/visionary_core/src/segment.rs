//! Text units and the per-segment generation lifecycle.

use crate::Image;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use visionary_error::{PipelineError, PipelineErrorKind, VisionaryResult};

/// One sentence-like slice of the input story, the unit of generation.
///
/// Created by the segmenter and never mutated afterwards. `index` defines
/// the total order of generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct TextUnit {
    /// Position in the story, starting at 0
    index: usize,
    /// Trimmed, non-empty text
    text: String,
}

impl TextUnit {
    /// Create a text unit.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Identifier of a segment, unique within one run.
///
/// # Examples
///
/// ```
/// use visionary_core::SegmentId;
///
/// let id = SegmentId::new(3, "run-a");
/// assert_eq!(id.to_string(), "seg-3-run-a");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct SegmentId(String);

impl SegmentId {
    /// Build the id of the segment at `index` in the run `run_id`.
    pub fn new(index: usize, run_id: impl std::fmt::Display) -> Self {
        Self(format!("seg-{}-{}", index, run_id))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle status of a segment.
///
/// `Pending` and `Processing` are transient; `Completed` and `Error` are
/// terminal for the run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SegmentStatus {
    /// Waiting for its turn
    #[default]
    Pending,
    /// Generation call in flight
    Processing,
    /// Image generated
    Completed,
    /// Generation failed
    Error,
}

impl SegmentStatus {
    /// Whether the segment has reached its final status for this run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SegmentStatus::Completed | SegmentStatus::Error)
    }
}

/// Generation state of one text unit.
///
/// The record moves `pending → processing → {completed | error}` and never
/// back. `image` is set iff the status is `completed`, `error_message` iff it
/// is `error`.
///
/// # Examples
///
/// ```
/// use visionary_core::{Image, SegmentId, SegmentState, SegmentStatus, TextUnit};
///
/// let unit = TextUnit::new(0, "A cat sat.");
/// let mut state = SegmentState::pending(SegmentId::new(0, "run"), &unit);
/// assert_eq!(*state.status(), SegmentStatus::Pending);
///
/// state.start().unwrap();
/// state.complete(Image::new("image/png", vec![1, 2, 3])).unwrap();
/// assert_eq!(*state.status(), SegmentStatus::Completed);
/// assert!(state.image().is_some());
///
/// // Terminal states cannot be re-entered.
/// assert!(state.start().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SegmentState {
    /// Unique id within the run
    id: SegmentId,
    /// Index of the text unit this state tracks
    index: usize,
    /// Text of the unit
    text: String,
    /// Current lifecycle status
    status: SegmentStatus,
    /// Generated image, present once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<Image>,
    /// User-facing failure message, present once failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl SegmentState {
    /// Create the pending state for a text unit.
    pub fn pending(id: SegmentId, unit: &TextUnit) -> Self {
        Self {
            id,
            index: *unit.index(),
            text: unit.text().clone(),
            status: SegmentStatus::Pending,
            image: None,
            error_message: None,
        }
    }

    /// Move from `pending` to `processing`.
    #[track_caller]
    pub fn start(&mut self) -> VisionaryResult<()> {
        self.expect_status(SegmentStatus::Pending, SegmentStatus::Processing)?;
        self.status = SegmentStatus::Processing;
        Ok(())
    }

    /// Move from `processing` to `completed` with the generated image.
    #[track_caller]
    pub fn complete(&mut self, image: Image) -> VisionaryResult<()> {
        self.expect_status(SegmentStatus::Processing, SegmentStatus::Completed)?;
        self.status = SegmentStatus::Completed;
        self.image = Some(image);
        Ok(())
    }

    /// Move from `processing` to `error` with a user-facing message.
    #[track_caller]
    pub fn fail(&mut self, message: impl Into<String>) -> VisionaryResult<()> {
        self.expect_status(SegmentStatus::Processing, SegmentStatus::Error)?;
        self.status = SegmentStatus::Error;
        self.error_message = Some(message.into());
        Ok(())
    }

    #[track_caller]
    fn expect_status(&self, from: SegmentStatus, to: SegmentStatus) -> VisionaryResult<()> {
        if self.status == from {
            return Ok(());
        }
        Err(PipelineError::new(PipelineErrorKind::InvalidTransition {
            segment: self.id.to_string(),
            from: self.status.to_string(),
            to: to.to_string(),
        })
        .into())
    }
}
