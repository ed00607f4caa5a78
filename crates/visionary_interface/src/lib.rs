//! Trait definitions for Visionary image generators.
//!
//! The pipeline only needs one capability from a backend: turn a piece of
//! story text plus a few reference images into one new image, or fail.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::ImageGenerator;
