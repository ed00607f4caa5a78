//! Visionary - turn a written story into consistent illustrated frames.
//!
//! A story is split into sentence-like segments, and each segment is
//! illustrated in order by an image model that also sees the most recent
//! frames, so characters and settings stay consistent from frame to frame.
//! A failed frame is marked and skipped; the rest of the story still runs.
//!
//! # Quick Start
//!
//! ```
//! use visionary::{PlaceholderGenerator, SegmentStatus, StoryPipeline};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (mut pipeline, mut snapshots) = StoryPipeline::new(PlaceholderGenerator::new());
//!
//! let finished = pipeline.run_story("A cat sat. It slept.").await?;
//! assert_eq!(finished.count(SegmentStatus::Completed), 2);
//!
//! // One snapshot per transition, plus the start and finish of the run.
//! let mut seen = 0;
//! while snapshots.try_recv().is_ok() {
//!     seen += 1;
//! }
//! assert_eq!(seen, 6);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `visionary_error` - Error types
//! - `visionary_core` - Text units, segment states, images and snapshots
//! - `visionary_interface` - The `ImageGenerator` trait
//! - `visionary_pipeline` - Segmenter, context window and orchestrator
//! - `visionary_models` - Gemini and placeholder generators
//!
//! This crate re-exports everything and adds configuration loading and
//! storyboard output used by the `visionary` binary.

mod config;
mod storyboard;

pub use visionary_core::*;
pub use visionary_error::*;
pub use visionary_interface::*;
pub use visionary_models::*;
pub use visionary_pipeline::*;

pub use config::{GeminiSettings, OutputSettings, VisionaryConfig};
pub use storyboard::{FrameEntry, MANIFEST_FILE, StoryManifest, frame_file_name, write_storyboard};
