//! Google Gemini image generation.
//!
//! [`GeminiImageGenerator`] calls the REST `generateContent` endpoint
//! directly with `reqwest`. Request and response bodies are plain serde
//! types, and the conversion functions are public so they
//! can be tested without the network.

mod dto;
mod generator;

pub use dto::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, InlineData,
    InlineDataPart, Part, TextPart,
};
pub use generator::{
    DEFAULT_API_KEY_ENV, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_STYLE,
    GeminiImageConfig, GeminiImageConfigBuilder, GeminiImageGenerator, build_request,
    frame_prompt, parse_response,
};
