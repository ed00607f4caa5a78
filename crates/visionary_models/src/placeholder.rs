//! Offline generator that draws the prompt into an SVG card.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;
use visionary_core::Image;
use visionary_error::VisionaryResult;
use visionary_interface::ImageGenerator;

/// MIME type of placeholder frames.
pub const PLACEHOLDER_MIME: &str = "image/svg+xml";

const LINE_WIDTH: usize = 38;

/// Generator that never calls a model.
///
/// Each frame is a small SVG showing its frame number, the segment text and
/// how many reference images the call received. Used for dry runs, demos and
/// wiring tests. Never fails.
///
/// # Examples
///
/// ```
/// use visionary_interface::ImageGenerator;
/// use visionary_models::{PLACEHOLDER_MIME, PlaceholderGenerator};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = PlaceholderGenerator::new();
/// let frame = generator.generate("A cat sat.", &[]).await?;
/// assert_eq!(frame.mime(), PLACEHOLDER_MIME);
/// assert_eq!(generator.frames_generated(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PlaceholderGenerator {
    frames: AtomicUsize,
}

impl PlaceholderGenerator {
    /// Create a new placeholder generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames drawn so far.
    pub fn frames_generated(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for PlaceholderGenerator {
    async fn generate(&self, prompt: &str, references: &[Image]) -> VisionaryResult<Image> {
        let frame = self.frames.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            frame,
            prompt_len = prompt.len(),
            references = references.len(),
            "PlaceholderGenerator: drawing frame (no model call)"
        );
        let svg = render_card(frame, prompt, references.len());
        Ok(Image::new(PLACEHOLDER_MIME, svg.into_bytes()))
    }

    fn provider_name(&self) -> &'static str {
        "placeholder"
    }

    fn model_name(&self) -> &str {
        "placeholder-svg"
    }
}

fn render_card(frame: usize, prompt: &str, references: usize) -> String {
    let mut svg = String::from(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="512" height="512" viewBox="0 0 512 512">"##,
    );
    svg.push_str(r##"<rect width="512" height="512" fill="#1f2937"/>"##);
    svg.push_str(&format!(
        r##"<text x="32" y="64" font-family="serif" font-size="32" fill="#f9fafb">Frame {}</text>"##,
        frame
    ));
    for (row, line) in wrap(prompt, LINE_WIDTH).iter().enumerate() {
        svg.push_str(&format!(
            r##"<text x="32" y="{}" font-family="serif" font-size="20" fill="#e5e7eb">{}</text>"##,
            120 + row * 28,
            escape_xml(line)
        ));
    }
    svg.push_str(&format!(
        r##"<text x="32" y="480" font-family="monospace" font-size="14" fill="#9ca3af">references: {}</text>"##,
        references
    ));
    svg.push_str("</svg>");
    svg
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_breaks_on_word_boundaries() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, ["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_keeps_overlong_word_whole() {
        assert_eq!(wrap("supercalifragilistic", 5), ["supercalifragilistic"]);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"Tom & "Jerry" <3 'cheese'"#),
            "Tom &amp; &quot;Jerry&quot; &lt;3 &apos;cheese&apos;"
        );
    }
}
