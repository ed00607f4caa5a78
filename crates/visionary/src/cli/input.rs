//! Reading story text.

use super::StoryInput;
use std::io::Read;
use visionary::{IoError, VisionaryResult};

/// Story text from `--input`, `--text` or standard input.
///
/// A leading byte-order mark is dropped.
pub fn read_story(input: &StoryInput) -> VisionaryResult<String> {
    if let Some(path) = &input.input {
        tracing::debug!(path = %path.display(), "Reading story from file");
        let text = std::fs::read_to_string(path)
            .map_err(|e| IoError::new(format!("{}: {}", path.display(), e)))?;
        return Ok(strip_bom(text));
    }
    if let Some(text) = &input.text {
        return Ok(strip_bom(text.clone()));
    }

    tracing::debug!("Reading story from stdin");
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| IoError::new(format!("stdin: {}", e)))?;
    Ok(strip_bom(text))
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
