//! Encoded image blobs exchanged with image generators.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use visionary_error::{PipelineError, PipelineErrorKind, VisionaryError, VisionaryResult};

/// MIME type assumed when a generator does not report one.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Maximum number of reference images handed to a generator.
pub const MAX_REFERENCE_IMAGES: usize = 2;

/// A generated image as an opaque, self-describing blob.
///
/// The pipeline never decodes pixels. It only passes images from one
/// generation call to the next and hands them to renderers. The bytes are
/// reference counted, so cloning an image (and therefore a snapshot) does not
/// copy the payload.
///
/// Serializes as a `data:` URI.
///
/// # Examples
///
/// ```
/// use visionary_core::Image;
///
/// let image = Image::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
/// let uri = image.to_data_uri();
/// assert_eq!(uri, "data:image/png;base64,iVBORw==");
/// assert_eq!(Image::from_data_uri(&uri).unwrap(), image);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Image {
    mime: String,
    data: Arc<[u8]>,
}

impl Image {
    /// Wrap encoded image bytes.
    pub fn new(mime: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }

    /// Decode a bare base64 payload.
    pub fn from_base64(mime: impl Into<String>, payload: &str) -> VisionaryResult<Self> {
        let data = STANDARD.decode(payload.trim()).map_err(|e| {
            PipelineError::new(PipelineErrorKind::InvalidDataUri(format!(
                "payload is not base64: {}",
                e
            )))
        })?;
        Ok(Self::new(mime, data))
    }

    /// Parse a `data:<mime>;base64,<payload>` URI.
    ///
    /// A string with no `data:` header is treated as a bare base64 PNG
    /// payload.
    pub fn from_data_uri(uri: &str) -> VisionaryResult<Self> {
        let Some(rest) = uri.strip_prefix("data:") else {
            return Self::from_base64(DEFAULT_IMAGE_MIME, uri);
        };

        let (header, payload) = rest.split_once(',').ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::InvalidDataUri(
                "missing ',' separator".to_string(),
            ))
        })?;

        let mime = header.strip_suffix(";base64").ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::InvalidDataUri(format!(
                "only base64 data URIs are supported, got header '{}'",
                header
            )))
        })?;

        let mime = if mime.is_empty() { DEFAULT_IMAGE_MIME } else { mime };
        Self::from_base64(mime, payload)
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Encoded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Size of the encoded payload in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Base64 payload without the data URI header.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Render as a `data:` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            "image/svg+xml" => "svg",
            _ => "bin",
        }
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("mime", &self.mime)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl From<Image> for String {
    fn from(image: Image) -> Self {
        image.to_data_uri()
    }
}

impl TryFrom<String> for Image {
    type Error = VisionaryError;

    fn try_from(uri: String) -> Result<Self, Self::Error> {
        Image::from_data_uri(&uri)
    }
}
