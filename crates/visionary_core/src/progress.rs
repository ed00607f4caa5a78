//! Run progress and the snapshots emitted after every transition.

use crate::{SegmentState, SegmentStatus};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Progress of a run as `(current, total)`.
///
/// `current` counts attempts, not successes: it is the 1-based position of
/// the segment most recently moved to `processing`.
///
/// # Examples
///
/// ```
/// use visionary_core::RunProgress;
///
/// let progress = RunProgress::new(1, 4);
/// assert_eq!(progress.to_string(), "1 / 4");
/// assert_eq!(progress.fraction(), 0.25);
/// assert_eq!(RunProgress::default().fraction(), 0.0);
/// ```
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
    Getters,
    derive_more::Display,
)]
#[display("{} / {}", current, total)]
pub struct RunProgress {
    /// Segments attempted so far
    current: usize,
    /// Segments in the run
    total: usize,
}

impl RunProgress {
    /// Create a progress pair.
    pub fn new(current: usize, total: usize) -> Self {
        Self { current, total }
    }

    /// Completion as a fraction in `0.0..=1.0`, for progress bars.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }

    /// Whether every segment has been attempted.
    pub fn is_complete(&self) -> bool {
        self.current == self.total
    }
}

/// Immutable copy of every segment state at one point in a run.
///
/// Renderers should replace whatever they drew for the previous snapshot
/// with this one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    /// All segments, in story order
    segments: Vec<SegmentState>,
    /// Progress accompanying this snapshot
    progress: RunProgress,
    /// Whether the run is still generating
    is_running: bool,
}

impl RunSnapshot {
    /// Create a snapshot.
    pub fn new(segments: Vec<SegmentState>, progress: RunProgress, is_running: bool) -> Self {
        Self {
            segments,
            progress,
            is_running,
        }
    }

    /// Number of segments with the given status.
    pub fn count(&self, status: SegmentStatus) -> usize {
        self.segments
            .iter()
            .filter(|segment| *segment.status() == status)
            .count()
    }

    /// Whether the run is over and every segment reached a terminal status.
    pub fn is_finished(&self) -> bool {
        !self.is_running && self.segments.iter().all(|s| s.status().is_terminal())
    }

    /// Consume the snapshot, returning its segments.
    pub fn into_segments(self) -> Vec<SegmentState> {
        self.segments
    }
}
