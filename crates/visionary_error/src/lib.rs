//! Error types for the Visionary story illustration pipeline.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` so the location is the call site
//!
//! Everything converts into [`VisionaryError`] with `?`.
//!
//! # Examples
//!
//! ```
//! use visionary_error::{VisionaryResult, HttpError};
//!
//! fn fetch_frame() -> VisionaryResult<Vec<u8>> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! assert!(fetch_frame().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod gemini;
mod message;
mod pipeline;

pub use error::{VisionaryError, VisionaryErrorKind, VisionaryResult};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use message::{ConfigError, HttpError, IoError, JsonError};
pub use pipeline::{PipelineError, PipelineErrorKind};
