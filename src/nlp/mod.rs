// src/nlp/mod.rs
pub mod gazetteer;
pub mod lexicon;
pub mod rules;

use crate::utils::error::ExtractError;

pub use gazetteer::GazetteerBuilder;
pub use rules::RuleRecognizer;

/// Coarse entity category. Everything that is not a person or an
/// organization is `Other` and ignored by the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Person,
    Organization,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    ProperNoun,
    Common,
    Numeral,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
    /// Byte offset of the token in the tagged text.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedSpan {
    pub text: String,
    pub kind: EntityKind,
    pub start: usize,
    pub end: usize,
}

/// Tokenizer, part-of-speech tagger and entity tagger behind one seam.
///
/// Implementations are configured once and then only read, so a single
/// instance can be shared by reference across worker threads.
pub trait EntityRecognizer {
    fn is_initialized(&self) -> bool;

    /// Entity spans in text order.
    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, ExtractError>;

    fn tokenize_pos(&self, text: &str) -> Result<Vec<Token>, ExtractError>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;

    /// Recognizer double returning prepared spans keyed by the exact page text.
    #[derive(Default)]
    pub struct ScriptedRecognizer {
        pub initialized: bool,
        spans: HashMap<String, Vec<TaggedSpan>>,
    }

    impl ScriptedRecognizer {
        pub fn new() -> Self {
            Self { initialized: true, spans: HashMap::new() }
        }

        pub fn uninitialized() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, text: &str, spans: &[(&str, EntityKind)]) -> Self {
            let tagged = spans
                .iter()
                .map(|(span, kind)| {
                    let start = text.find(span).unwrap_or(0);
                    TaggedSpan { text: span.to_string(), kind: *kind, start, end: start + span.len() }
                })
                .collect();
            self.spans.insert(text.to_string(), tagged);
            self
        }
    }

    impl EntityRecognizer for ScriptedRecognizer {
        fn is_initialized(&self) -> bool {
            self.initialized
        }

        fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, ExtractError> {
            if !self.initialized {
                return Err(ExtractError::ModelNotInitialized);
            }
            Ok(self.spans.get(text).cloned().unwrap_or_default())
        }

        fn tokenize_pos(&self, _text: &str) -> Result<Vec<Token>, ExtractError> {
            if !self.initialized {
                return Err(ExtractError::ModelNotInitialized);
            }
            Ok(Vec::new())
        }
    }
}
