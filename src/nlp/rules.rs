// src/nlp/rules.rs
//! Rule-based recognizer: gazetteer exact matches plus capitalization
//! heuristics for everything the gazetteer does not cover.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::nlp::gazetteer::EntityPattern;
use crate::nlp::lexicon::{is_connector, is_org_suffix, is_person_title, is_stop_word};
use crate::nlp::{EntityKind, EntityRecognizer, PartOfSpeech, TaggedSpan, Token};
use crate::utils::error::ExtractError;

// Words (letters/digits, optionally joined by ' . - &) or single punctuation marks
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’.&-][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]")
        .expect("Failed to compile TOKEN_RE")
});

#[derive(Debug, Clone, Copy)]
struct RawToken<'t> {
    text: &'t str,
    offset: usize,
}

impl RawToken<'_> {
    fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    fn is_word(&self) -> bool {
        self.text.chars().next().map(char::is_alphanumeric).unwrap_or(false)
    }

    fn is_capitalized(&self) -> bool {
        self.text.chars().next().map(char::is_uppercase).unwrap_or(false)
    }

    fn is_numeral(&self) -> bool {
        self.text.chars().next().map(|c| c.is_numeric()).unwrap_or(false)
    }

    /// Capitalized word that is not a stop word, the building block of a heuristic span.
    fn is_name_word(&self) -> bool {
        self.is_capitalized() && !is_stop_word(self.text)
    }
}

fn tokenize(text: &str) -> Vec<RawToken<'_>> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| RawToken { text: m.as_str(), offset: m.start() })
        .collect()
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    text: String,
    tokens: Vec<String>,
    kind: EntityKind,
}

/// Gazetteer patterns indexed by their first token.
#[derive(Debug, Default)]
struct PatternIndex {
    by_first_token: HashMap<String, Vec<CompiledPattern>>,
    len: usize,
}

impl PatternIndex {
    fn add(&mut self, pattern: EntityPattern) {
        let tokens: Vec<String> = tokenize(&pattern.pattern).iter().map(|t| t.text.to_string()).collect();
        let Some(first) = tokens.first().cloned() else {
            return;
        };
        let bucket = self.by_first_token.entry(first).or_default();
        bucket.push(CompiledPattern { text: pattern.pattern.trim().to_string(), tokens, kind: pattern.kind });
        // Longest pattern wins at a given position; stable sort keeps load order for ties
        bucket.sort_by(|a, b| b.tokens.len().cmp(&a.tokens.len()));
        self.len += 1;
    }

    /// Non-overlapping exact matches, scanned left to right.
    /// Returns (first token, one past last token, kind).
    fn find_matches(&self, text: &str, tokens: &[RawToken<'_>]) -> Vec<(usize, usize, EntityKind)> {
        let mut matches = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let found = self.by_first_token.get(tokens[i].text).and_then(|bucket| {
                bucket.iter().find(|pattern| {
                    let end = i + pattern.tokens.len();
                    end <= tokens.len()
                        && tokens[i..end].iter().zip(&pattern.tokens).all(|(t, p)| t.text == p)
                        && text[tokens[i].offset..tokens[end - 1].end()] == pattern.text
                })
            });
            match found {
                Some(pattern) => {
                    let end = i + pattern.tokens.len();
                    matches.push((i, end, pattern.kind));
                    i = end;
                }
                None => i += 1,
            }
        }
        matches
    }
}

/// Production recognizer. Built uninitialized, then loaded with gazetteer
/// patterns once; read-only afterwards.
#[derive(Debug, Default)]
pub struct RuleRecognizer {
    index: Option<PatternIndex>,
}

impl RuleRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patterns(patterns: impl IntoIterator<Item = EntityPattern>) -> Self {
        let mut recognizer = Self::new();
        recognizer.load_patterns(patterns);
        recognizer
    }

    /// Compiles patterns into the recognizer and marks it ready. An empty
    /// pattern list still initializes it.
    pub fn load_patterns(&mut self, patterns: impl IntoIterator<Item = EntityPattern>) -> usize {
        let index = self.index.get_or_insert_with(PatternIndex::default);
        for pattern in patterns {
            index.add(pattern);
        }
        tracing::debug!("Recognizer holds {} gazetteer patterns", index.len);
        index.len
    }

    pub fn pattern_count(&self) -> usize {
        self.index.as_ref().map(|index| index.len).unwrap_or(0)
    }

    fn ready_index(&self) -> Result<&PatternIndex, ExtractError> {
        self.index.as_ref().ok_or(ExtractError::ModelNotInitialized)
    }

    /// Marks tokens covered by a gazetteer match.
    fn gazetteer_coverage(
        index: &PatternIndex,
        text: &str,
        tokens: &[RawToken<'_>],
    ) -> (Vec<bool>, Vec<(usize, usize, EntityKind)>) {
        let matches = index.find_matches(text, tokens);
        let mut covered = vec![false; tokens.len()];
        for &(start, end, _) in &matches {
            covered[start..end].iter_mut().for_each(|c| *c = true);
        }
        (covered, matches)
    }
}

fn line_break_between(text: &str, left: &RawToken<'_>, right: &RawToken<'_>) -> bool {
    text[left.end()..right.offset].contains('\n')
}

/// Title word right before `start`, allowing one period in between ("Dr. Rao").
fn preceded_by_title(tokens: &[RawToken<'_>], start: usize) -> bool {
    match start {
        0 => false,
        1 => is_person_title(tokens[0].text),
        _ => {
            let prev = &tokens[start - 1];
            is_person_title(prev.text) || (prev.text == "." && is_person_title(tokens[start - 2].text))
        }
    }
}

fn classify(words: &[RawToken<'_>], titled: bool) -> EntityKind {
    let name_words: Vec<&str> = words.iter().filter(|w| !is_connector(w.text)).map(|w| w.text).collect();
    let has_connector = name_words.len() < words.len();

    if name_words.last().map(|w| is_org_suffix(w)).unwrap_or(false) {
        return EntityKind::Organization;
    }
    let all_caps = name_words.iter().all(|w| !w.chars().any(char::is_lowercase))
        && name_words.iter().map(|w| w.chars().filter(|c| c.is_alphabetic()).count()).sum::<usize>() >= 2;
    if all_caps {
        return EntityKind::Organization;
    }
    if titled {
        return EntityKind::Person;
    }
    if has_connector || name_words.len() >= 4 {
        return EntityKind::Organization;
    }
    if name_words.len() >= 2 {
        return EntityKind::Person;
    }
    EntityKind::Other
}

impl EntityRecognizer for RuleRecognizer {
    fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, ExtractError> {
        let index = self.ready_index()?;
        let tokens = tokenize(text);
        let (covered, matches) = Self::gazetteer_coverage(index, text, &tokens);

        let mut spans: Vec<TaggedSpan> = matches
            .into_iter()
            .map(|(start, end, kind)| {
                let (lo, hi) = (tokens[start].offset, tokens[end - 1].end());
                TaggedSpan { text: text[lo..hi].to_string(), kind, start: lo, end: hi }
            })
            .collect();

        let free = |i: usize| i < tokens.len() && !covered[i];

        let mut i = 0;
        while i < tokens.len() {
            if !free(i) || !tokens[i].is_name_word() {
                i += 1;
                continue;
            }

            let mut start = i;
            let mut end = i + 1;
            loop {
                let prev = &tokens[end - 1];
                if free(end) && !line_break_between(text, prev, &tokens[end]) && tokens[end].is_name_word() {
                    end += 1;
                } else if free(end)
                    && free(end + 1)
                    && is_connector(tokens[end].text)
                    && tokens[end + 1].is_name_word()
                    && !line_break_between(text, prev, &tokens[end])
                    && !line_break_between(text, &tokens[end], &tokens[end + 1])
                {
                    end += 2;
                } else {
                    break;
                }
            }
            i = end;

            if tokens[start..end].iter().all(|t| is_person_title(t.text)) {
                continue;
            }

            let mut titled = preceded_by_title(&tokens, start);
            if is_person_title(tokens[start].text) && end - start >= 2 {
                titled = true;
                start += 1;
            }

            let kind = classify(&tokens[start..end], titled);
            let (lo, hi) = (tokens[start].offset, tokens[end - 1].end());
            tracing::trace!("Heuristic span '{}' tagged {:?}", &text[lo..hi], kind);
            spans.push(TaggedSpan { text: text[lo..hi].to_string(), kind, start: lo, end: hi });
        }

        spans.sort_by_key(|span| span.start);
        Ok(spans)
    }

    fn tokenize_pos(&self, text: &str) -> Result<Vec<Token>, ExtractError> {
        let index = self.ready_index()?;
        let tokens = tokenize(text);
        let (covered, _) = Self::gazetteer_coverage(index, text, &tokens);

        Ok(tokens
            .iter()
            .zip(covered)
            .map(|(token, in_gazetteer)| {
                let is_stop = is_stop_word(token.text);
                let pos = if !token.is_word() {
                    PartOfSpeech::Punctuation
                } else if token.is_numeral() {
                    PartOfSpeech::Numeral
                } else if in_gazetteer || (token.is_capitalized() && !is_stop) {
                    PartOfSpeech::ProperNoun
                } else {
                    PartOfSpeech::Common
                };
                Token { text: token.text.to_string(), pos, is_stop, offset: token.offset }
            })
            .collect())
    }
}
