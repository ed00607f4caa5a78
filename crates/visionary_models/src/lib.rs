//! Image generator backends for Visionary.
//!
//! - [`GeminiImageGenerator`] - Google Gemini image model over REST
//! - [`PlaceholderGenerator`] - offline SVG frames for dry runs and demos
//!
//! Both implement [`visionary_interface::ImageGenerator`] and can be handed
//! to `visionary_pipeline::StoryPipeline` directly or boxed.
//!
//! ```no_run
//! use visionary_interface::ImageGenerator;
//! use visionary_models::{GeminiImageConfig, GeminiImageGenerator, PlaceholderGenerator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let offline = true;
//! let generator: Box<dyn ImageGenerator> = if offline {
//!     Box::new(PlaceholderGenerator::new())
//! } else {
//!     Box::new(GeminiImageGenerator::new(GeminiImageConfig::default())?)
//! };
//! println!("Using {}", generator.provider_name());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod placeholder;

pub use gemini::{
    Candidate, Content, DEFAULT_API_KEY_ENV, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL,
    DEFAULT_STYLE, GeminiImageConfig, GeminiImageConfigBuilder, GeminiImageGenerator,
    GenerateContentRequest, GenerateContentResponse, InlineData, InlineDataPart, Part, TextPart,
    build_request, frame_prompt, parse_response,
};
pub use placeholder::{PLACEHOLDER_MIME, PlaceholderGenerator};
