//! Segment command handler.

use super::StoryInput;
use super::input::read_story;
use visionary::{VisionaryResult, segment};

/// Print each unit on its own line, prefixed with its index.
pub fn print_segments(input: &StoryInput) -> VisionaryResult<()> {
    let text = read_story(input)?;
    let units = segment(&text);
    tracing::debug!(units = units.len(), "Segmented story");

    for unit in &units {
        println!("{}\t{}", unit.index(), unit.text());
    }
    Ok(())
}
