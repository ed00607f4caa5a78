//! Story pipeline error types.

/// Specific error conditions for segmentation and orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// The image generator did not produce an image.
    ///
    /// Generators may report any failure this way; the orchestrator never
    /// looks inside.
    #[display("Generation failed: {}", _0)]
    GenerationFailed(String),
    /// A segment was asked to move through its lifecycle out of order
    #[display("Segment '{}' cannot move from {} to {}", segment, from, to)]
    InvalidTransition {
        /// Segment identifier
        segment: String,
        /// Status before the attempted transition
        from: String,
        /// Requested status
        to: String,
    },
    /// A string that should have been a base64 data URI was not
    #[display("Invalid data URI: {}", _0)]
    InvalidDataUri(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use visionary_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::GenerationFailed("timeout".into()));
/// assert!(format!("{}", err).contains("timeout"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
