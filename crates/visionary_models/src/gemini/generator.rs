//! Gemini image generation over REST.

use super::dto::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_builder::Builder;
use derive_getters::Getters;
use reqwest::Client;
use std::env;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use visionary_core::{DEFAULT_IMAGE_MIME, Image, MAX_REFERENCE_IMAGES};
use visionary_error::{GeminiError, GeminiErrorKind, VisionaryResult};
use visionary_interface::ImageGenerator;

/// Default image model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image";

/// Default REST base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable read when no API key is configured.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Style appended to every frame prompt.
pub const DEFAULT_STYLE: &str = "cinematic, detailed storybook illustration";

/// Settings for [`GeminiImageGenerator`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use visionary_models::{DEFAULT_GEMINI_MODEL, GeminiImageConfig};
///
/// let config = GeminiImageConfig::builder()
///     .api_key("test-key")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(config.model(), DEFAULT_GEMINI_MODEL);
/// assert_eq!(config.api_key().as_deref(), Some("test-key"));
/// ```
#[derive(Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct GeminiImageConfig {
    /// Model name, without the `models/` prefix
    #[builder(default = "DEFAULT_GEMINI_MODEL.to_string()")]
    model: String,
    /// REST base URL
    #[builder(default = "DEFAULT_GEMINI_BASE_URL.to_string()")]
    base_url: String,
    /// Explicit API key; takes precedence over `api_key_env`
    #[builder(default, setter(into, strip_option))]
    api_key: Option<String>,
    /// Environment variable holding the API key
    #[builder(default = "DEFAULT_API_KEY_ENV.to_string()")]
    api_key_env: String,
    /// Whole-request timeout
    #[builder(default, setter(strip_option))]
    timeout: Option<Duration>,
    /// Art direction appended to every prompt
    #[builder(default = "DEFAULT_STYLE.to_string()")]
    style: String,
}

impl GeminiImageConfig {
    /// Creates a new builder for `GeminiImageConfig`.
    pub fn builder() -> GeminiImageConfigBuilder {
        GeminiImageConfigBuilder::default()
    }
}

impl std::fmt::Debug for GeminiImageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiImageConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_key_env", &self.api_key_env)
            .field("timeout", &self.timeout)
            .field("style", &self.style)
            .finish()
    }
}

impl Default for GeminiImageConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout: None,
            style: DEFAULT_STYLE.to_string(),
        }
    }
}

/// Image generator backed by the Gemini `generateContent` endpoint.
///
/// Reference images are sent as inline data ahead of the frame prompt, and
/// the first inline image in the first candidate is returned. Calls are
/// never retried.
///
/// # Example
///
/// ```no_run
/// use visionary_interface::ImageGenerator;
/// use visionary_models::{GeminiImageConfig, GeminiImageGenerator};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = GeminiImageGenerator::new(GeminiImageConfig::default())?;
/// let frame = generator.generate("A cat sat.", &[]).await?;
/// println!("{} bytes of {}", frame.len(), frame.mime());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GeminiImageGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    style: String,
}

impl std::fmt::Debug for GeminiImageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiImageGenerator")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiImageGenerator {
    /// Creates a generator from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No API key is configured and the key environment variable is not set
    /// - The HTTP client cannot be initialized
    #[instrument(skip_all, fields(model = %config.model()))]
    pub fn new(config: GeminiImageConfig) -> VisionaryResult<Self> {
        let api_key = match config.api_key() {
            Some(key) => key.clone(),
            None => env::var(config.api_key_env()).map_err(|_| {
                GeminiError::new(GeminiErrorKind::MissingApiKey(
                    config.api_key_env().clone(),
                ))
            })?,
        };

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(*timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        debug!("Created Gemini image generator");
        Ok(Self {
            client,
            api_key,
            model: config.model().clone(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            style: config.style().clone(),
        })
    }

    /// Endpoint URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    #[instrument(
        skip(self, prompt, references),
        fields(model = %self.model, references = references.len())
    )]
    async fn generate(&self, prompt: &str, references: &[Image]) -> VisionaryResult<Image> {
        let request = build_request(prompt, references, &self.style);
        let url = self.endpoint();
        debug!(url = %url, "Sending Gemini image request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                GeminiError::new(GeminiErrorKind::ApiRequest(format!("Request failed: {}", e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let kind = GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            };
            warn!(
                status = status.as_u16(),
                retryable = kind.is_retryable(),
                "Gemini request rejected"
            );
            return Err(GeminiError::new(kind).into());
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        parse_response(&body)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// The prompt sent for one story segment.
///
/// # Examples
///
/// ```
/// use visionary_models::frame_prompt;
///
/// let prompt = frame_prompt("A cat sat.", "watercolor");
/// assert!(prompt.contains("\"A cat sat.\""));
/// assert!(prompt.ends_with("Style: watercolor."));
/// ```
pub fn frame_prompt(segment: &str, style: &str) -> String {
    format!(
        "Generate a high-quality illustration for this story segment: \"{}\". \
         Maintain visual consistency with the provided reference images if they exist. \
         Focus on character, setting, and mood continuity. \
         Style: {}.",
        segment, style
    )
}

/// Builds the request body for one frame.
///
/// Reference images come first as inline data, followed by the prompt.
/// Only the last [`MAX_REFERENCE_IMAGES`] references are included.
pub fn build_request(prompt: &str, references: &[Image], style: &str) -> GenerateContentRequest {
    let start = references.len().saturating_sub(MAX_REFERENCE_IMAGES);
    let mut parts: Vec<Part> = references[start..]
        .iter()
        .map(|image| Part::inline(image.mime(), image.to_base64()))
        .collect();
    parts.push(Part::text(frame_prompt(prompt, style)));

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
    }
}

/// Extracts the generated image from a response body.
///
/// # Errors
///
/// - [`GeminiErrorKind::NoCandidates`] when the first candidate has no parts
/// - [`GeminiErrorKind::NoImageData`] when none of its parts is inline data
/// - [`GeminiErrorKind::Base64Decode`] when the payload is not valid base64
pub fn parse_response(response: &GenerateContentResponse) -> VisionaryResult<Image> {
    let candidate = response.candidates.first();
    let parts = candidate
        .and_then(|c| c.content.as_ref())
        .map(|content| content.parts.as_slice())
        .filter(|parts| !parts.is_empty())
        .ok_or_else(|| {
            debug!(
                finish_reason = ?candidate.and_then(|c| c.finish_reason.as_deref()),
                "Gemini response had no content parts"
            );
            GeminiError::new(GeminiErrorKind::NoCandidates)
        })?;

    let inline = parts
        .iter()
        .find_map(|part| match part {
            Part::InlineData(inline) => Some(&inline.inline_data),
            _ => None,
        })
        .ok_or_else(|| GeminiError::new(GeminiErrorKind::NoImageData))?;

    let bytes = STANDARD
        .decode(inline.data.trim())
        .map_err(|e| GeminiError::new(GeminiErrorKind::Base64Decode(e.to_string())))?;

    let mime = if inline.mime_type.is_empty() {
        DEFAULT_IMAGE_MIME
    } else {
        inline.mime_type.as_str()
    };
    Ok(Image::new(mime, bytes))
}
