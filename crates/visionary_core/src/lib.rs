//! Core data types for the Visionary story illustration pipeline.
//!
//! These types describe a run: the text units a story is split into, the
//! lifecycle state of each unit's frame, the images generators exchange, and
//! the snapshots handed to renderers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod image;
mod progress;
mod segment;

pub use image::{DEFAULT_IMAGE_MIME, Image, MAX_REFERENCE_IMAGES};
pub use progress::{RunProgress, RunSnapshot};
pub use segment::{SegmentId, SegmentState, SegmentStatus, TextUnit};
