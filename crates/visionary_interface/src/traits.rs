//! The image generator collaborator contract.

use async_trait::async_trait;
use std::sync::Arc;
use visionary_core::Image;
use visionary_error::VisionaryResult;

/// Core trait that every image backend implements.
///
/// The orchestrator awaits each call before touching any other segment, so
/// implementations never see concurrent calls from one pipeline. Any `Err`
/// is treated the same way: the segment is marked failed and the run moves
/// on.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use visionary_core::Image;
/// use visionary_error::VisionaryResult;
/// use visionary_interface::ImageGenerator;
///
/// struct Solid;
///
/// #[async_trait]
/// impl ImageGenerator for Solid {
///     async fn generate(&self, _prompt: &str, _references: &[Image]) -> VisionaryResult<Image> {
///         Ok(Image::new("image/png", vec![0u8; 8]))
///     }
///
///     fn provider_name(&self) -> &'static str {
///         "solid"
///     }
///
///     fn model_name(&self) -> &str {
///         "solid-v1"
///     }
/// }
/// ```
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for `prompt`, using `references` (oldest first)
    /// for visual continuity.
    async fn generate(&self, prompt: &str, references: &[Image]) -> VisionaryResult<Image>;

    /// Provider name (e.g., "gemini", "placeholder").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.5-flash-image").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<G: ImageGenerator + ?Sized> ImageGenerator for Box<G> {
    async fn generate(&self, prompt: &str, references: &[Image]) -> VisionaryResult<Image> {
        (**self).generate(prompt, references).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<G: ImageGenerator + ?Sized> ImageGenerator for Arc<G> {
    async fn generate(&self, prompt: &str, references: &[Image]) -> VisionaryResult<Image> {
        (**self).generate(prompt, references).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
