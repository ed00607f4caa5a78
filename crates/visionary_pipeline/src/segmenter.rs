//! Sentence-level splitting of story text.
//!
//! A boundary is any run of whitespace that directly follows `.`, `!` or `?`.
//! This is a heuristic: abbreviations ("Dr. Smith"), decimals followed by a
//! space and punctuation inside quotes are split like any other sentence end.
//! A byte-order mark (U+FEFF) counts as whitespace.

use regex::Regex;
use std::sync::LazyLock;
use visionary_core::TextUnit;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.!?]([\s\x{FEFF}]+)").expect("sentence boundary pattern is valid")
});

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == BYTE_ORDER_MARK
}

/// Split story text into ordered, trimmed, non-empty text units.
///
/// Empty or whitespace-only input yields no units. Trailing text without
/// closing punctuation still becomes a unit.
///
/// # Examples
///
/// ```
/// use visionary_pipeline::segment;
///
/// let units = segment("A. B! C?");
/// let texts: Vec<&str> = units.iter().map(|u| u.text().as_str()).collect();
/// assert_eq!(texts, ["A.", "B!", "C?"]);
/// assert_eq!(*units[2].index(), 2);
///
/// assert!(segment("   \n").is_empty());
/// ```
pub fn segment(text: &str) -> Vec<TextUnit> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for captures in SENTENCE_BOUNDARY.captures_iter(text) {
        let Some(gap) = captures.get(1) else {
            continue;
        };
        pieces.push(&text[start..gap.start()]);
        start = gap.end();
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(|piece| piece.trim_matches(is_blank))
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(index, piece)| TextUnit::new(index, piece))
        .collect()
}
