// src/utils/text.rs
//! Normalization helpers shared by the extractors.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ORG_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9 ]+").expect("Failed to compile NON_ORG_CHARS_RE"));

static NON_PERSON_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z ]+").expect("Failed to compile NON_PERSON_CHARS_RE"));

/// Organization form of an entity: ASCII letters, digits and spaces only,
/// trimmed and lowercased.
pub fn organization_form(text: &str) -> String {
    NON_ORG_CHARS_RE.replace_all(text, "").trim().to_lowercase()
}

/// Person form of an entity: ASCII letters and spaces only, trimmed and
/// lowercased. Digits are dropped, so "John 3M Smith" becomes "john m smith".
pub fn person_form(text: &str) -> String {
    NON_PERSON_CHARS_RE.replace_all(text, "").trim().to_lowercase()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercases page text and removes line feeds so phrases broken across
/// lines become contiguous.
pub fn flatten_page(text: &str) -> String {
    text.to_lowercase().replace('\n', "")
}

/// Returns the slice spanning `before` characters left of byte offset `start`
/// through `after` characters right of byte offset `end`, clamped to the text.
///
/// Offsets must sit on char boundaries (as regex and `match_indices` offsets do).
pub fn char_window(text: &str, start: usize, end: usize, before: usize, after: usize) -> &str {
    let lo = if before == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(before - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let hi = text[end..]
        .char_indices()
        .nth(after)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[lo..hi]
}
