//! Top-level error wrapper types.

use crate::{ConfigError, GeminiError, HttpError, IoError, JsonError, PipelineError};

/// Every error the workspace can surface.
///
/// # Examples
///
/// ```
/// use visionary_error::{VisionaryError, HttpError};
///
/// let err: VisionaryError = HttpError::new("Connection failed").into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VisionaryErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Filesystem error
    #[from(IoError)]
    Io(IoError),
    /// Gemini backend error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Segmentation or orchestration error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Visionary error with kind discrimination.
///
/// # Examples
///
/// ```
/// use visionary_error::{ConfigError, VisionaryErrorKind, VisionaryResult};
///
/// fn might_fail() -> VisionaryResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), VisionaryErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Visionary Error: {}", _0)]
pub struct VisionaryError(Box<VisionaryErrorKind>);

impl VisionaryError {
    /// Create a new error from a kind.
    pub fn new(kind: VisionaryErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VisionaryErrorKind {
        &self.0
    }
}

impl<T> From<T> for VisionaryError
where
    T: Into<VisionaryErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Visionary operations.
pub type VisionaryResult<T> = std::result::Result<T, VisionaryError>;
