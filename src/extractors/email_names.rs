// src/extractors/email_names.rs
//! Recovers author names from the text right before email addresses.
//!
//! Report authors usually sign with "Name Surname  name.surname@broker.com",
//! so a run of at least two proper nouns shortly before an address is taken
//! as a person name.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::config::ExtractorConfig;
use crate::nlp::{EntityRecognizer, PartOfSpeech, Token};
use crate::utils::error::ExtractError;
use crate::utils::text::char_window;
use crate::utils::OrderedSet;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("Failed to compile EMAIL_RE"));

pub struct EmailNameExtractor<'a> {
    recognizer: &'a dyn EntityRecognizer,
    config: &'a ExtractorConfig,
}

impl<'a> EmailNameExtractor<'a> {
    pub fn new(recognizer: &'a dyn EntityRecognizer, config: &'a ExtractorConfig) -> Self {
        Self { recognizer, config }
    }

    /// Lowercase names found before any email address on any page, in first-seen order.
    pub fn extract_names_near_emails<S: AsRef<str>>(&self, pages: &[S]) -> Result<OrderedSet, ExtractError> {
        let mut names = OrderedSet::new();

        for (page_index, page) in pages.iter().enumerate() {
            let text = page.as_ref();
            let mut emails = 0;

            for email in EMAIL_RE.find_iter(text) {
                emails += 1;
                // Window never reaches into the previous page: each page is scanned on its own
                let window = char_window(text, email.start(), email.start(), self.config.email_name_window, 0);
                let tokens = self.recognizer.tokenize_pos(window)?;
                let content = tokens.iter().filter(|token| !token.is_stop);

                for name in proper_noun_runs(content, self.config.min_proper_noun_run) {
                    if names.insert(name.clone()) {
                        tracing::trace!("Page {}: name '{}' before {}", page_index, name, email.as_str());
                    }
                }
            }

            if emails > 0 {
                tracing::debug!("Page {}: {} email addresses scanned", page_index, emails);
            }
        }

        Ok(names)
    }
}

/// Joins each maximal run of proper nouns holding at least `min_run` tokens,
/// lowercased and single-space separated.
pub fn proper_noun_runs<'t>(tokens: impl IntoIterator<Item = &'t Token>, min_run: usize) -> Vec<String> {
    let mut runs = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for token in tokens {
        if token.pos == PartOfSpeech::ProperNoun {
            buffer.push(token.text.as_str());
        } else {
            flush_run(&mut buffer, min_run, &mut runs);
        }
    }
    flush_run(&mut buffer, min_run, &mut runs);

    runs
}

fn flush_run(buffer: &mut Vec<&str>, min_run: usize, runs: &mut Vec<String>) {
    if buffer.len() >= min_run {
        runs.push(buffer.join(" ").to_lowercase());
    }
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::testing::ScriptedRecognizer;
    use crate::nlp::RuleRecognizer;

    fn token(text: &str, pos: PartOfSpeech) -> Token {
        Token { text: text.to_string(), pos, is_stop: false, offset: 0 }
    }

    fn extract(pages: &[&str]) -> Vec<String> {
        let recognizer = RuleRecognizer::with_patterns(Vec::new());
        let config = ExtractorConfig::default();
        EmailNameExtractor::new(&recognizer, &config)
            .extract_names_near_emails(pages)
            .unwrap()
            .into_vec()
    }

    #[test]
    fn runs_need_two_proper_nouns() {
        use PartOfSpeech::*;
        let tokens = vec![
            token("Ravi", ProperNoun),
            token("wrote", Common),
            token("Asha", ProperNoun),
            token("Rao", ProperNoun),
            token(",", Punctuation),
            token("Neha", ProperNoun),
            token("Jain", ProperNoun),
            token("Shah", ProperNoun),
        ];
        assert_eq!(proper_noun_runs(&tokens, 2), vec!["asha rao", "neha jain shah"]);
    }

    #[test]
    fn page_without_email_yields_nothing() {
        assert!(extract(&["Jane Doe, Kotak Securities, Mumbai"]).is_empty());
    }

    #[test]
    fn finds_author_before_email_in_multi_page_document() {
        let pages = [
            "Company update: quarterly results",
            "Equity note. This report prepared by Jane Doe regarding jane.doe@firm.com",
            "Financial tables",
            "Disclosures",
        ];
        assert_eq!(extract(&pages), vec!["jane doe"]);
    }

    #[test]
    fn single_proper_noun_is_not_a_name() {
        assert!(extract(&["for queries write to Ravi at ravi@broker.in"]).is_empty());
    }

    #[test]
    fn punctuation_splits_adjacent_names() {
        assert_eq!(extract(&["Ravi Kumar, Asha Rao ravi@broker.in"]), vec!["ravi kumar", "asha rao"]);
    }

    #[test]
    fn names_beyond_window_are_ignored() {
        let page = format!("Jane Doe {}jane@firm.com", "x ".repeat(60));
        assert!(extract(&[page.as_str()]).is_empty());
    }

    #[test]
    fn window_stops_at_page_boundary() {
        let pages = ["Equity research report by Jane Doe", "jane.doe@firm.com for queries"];
        assert!(extract(&pages).is_empty());
    }

    #[test]
    fn window_covers_exactly_one_hundred_characters() {
        // "Jane Doe" plus 92 spaces fills the 100 characters before the address
        let inside = format!("Jane Doe{}jane.doe@firm.com", " ".repeat(92));
        assert_eq!(extract(&[inside.as_str()]), vec!["jane doe"]);

        // One more space leaves only "ane Doe" in the window
        let outside = format!("Jane Doe{}jane.doe@firm.com", " ".repeat(93));
        assert!(extract(&[outside.as_str()]).is_empty());
    }

    #[test]
    fn repeated_names_are_kept_once() {
        // "Call" is a stop word, so the second run is "ASHA RAO" again
        let pages = ["Asha Rao asha@broker.in", "Call ASHA RAO at desk@broker.in", "asha rao x@y.z"];
        assert_eq!(extract(&pages), vec!["asha rao"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let pages = ["Ravi Kumar ravi@broker.in and Asha Rao asha@broker.in"];
        assert_eq!(extract(&pages), extract(&pages));
    }

    #[test]
    fn uninitialized_recognizer_fails() {
        let recognizer = ScriptedRecognizer::uninitialized();
        let config = ExtractorConfig::default();
        let result = EmailNameExtractor::new(&recognizer, &config).extract_names_near_emails(&["a@b.c"]);
        assert!(matches!(result, Err(ExtractError::ModelNotInitialized)));
    }
}
