//! Story segmentation and sequential frame generation for Visionary.
//!
//! - [`segment`] splits story text into sentence-like [`TextUnit`]s.
//! - [`StoryPipeline`] generates one image per unit, in order, passing the
//!   last [`MAX_REFERENCE_IMAGES`] successful images along for continuity.
//!
//! [`TextUnit`]: visionary_core::TextUnit

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod orchestrator;
mod segmenter;

pub use context::ContextWindow;
pub use orchestrator::{GENERATION_FAILED_MESSAGE, StoryPipeline};
pub use segmenter::segment;
pub use tokio_util::sync::CancellationToken;
pub use visionary_core::MAX_REFERENCE_IMAGES;
