// src/extractors/entities.rs
//! Author, author organization and organization mentions from tagged entities.

use serde::Serialize;

use crate::extractors::config::ExtractorConfig;
use crate::nlp::{EntityKind, EntityRecognizer};
use crate::utils::error::ExtractError;
use crate::utils::text::{organization_form, person_form, word_count};
use crate::utils::OrderedSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameOrgResult {
    /// Person entities on the author pages.
    pub author_names: OrderedSet,
    /// Organization entities on the author pages.
    pub author_orgs: OrderedSet,
    /// Organization entities on every page.
    pub all_orgs: OrderedSet,
}

pub struct EntityExtractor<'a> {
    recognizer: &'a dyn EntityRecognizer,
    config: &'a ExtractorConfig,
}

impl<'a> EntityExtractor<'a> {
    pub fn new(recognizer: &'a dyn EntityRecognizer, config: &'a ExtractorConfig) -> Self {
        Self { recognizer, config }
    }

    pub fn extract_name_and_org<S: AsRef<str>>(&self, pages: &[S]) -> Result<NameOrgResult, ExtractError> {
        if !self.recognizer.is_initialized() {
            return Err(ExtractError::ModelNotInitialized);
        }

        let mut result = NameOrgResult::default();

        for (page_index, page) in pages.iter().enumerate() {
            let spans = self.recognizer.tag(page.as_ref())?;
            let author_page = self.config.is_author_page(page_index);
            tracing::debug!("Page {}: {} tagged spans (author page: {})", page_index, spans.len(), author_page);

            for span in spans {
                match span.kind {
                    EntityKind::Organization => {
                        let org = organization_form(&span.text);
                        if !self.config.organization_words.contains(&word_count(&org)) {
                            continue;
                        }
                        if author_page && result.author_orgs.insert(org.clone()) {
                            tracing::trace!("Page {}: author organization '{}'", page_index, org);
                        }
                        result.all_orgs.insert(org);
                    }
                    EntityKind::Person if author_page => {
                        let name = person_form(&span.text);
                        if self.config.person_words.contains(&word_count(&name)) && result.author_names.insert(name.clone()) {
                            tracing::trace!("Page {}: author name '{}'", page_index, name);
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::testing::ScriptedRecognizer;
    use crate::nlp::EntityKind::{Organization as Org, Other, Person};

    fn run(recognizer: &ScriptedRecognizer, pages: &[&str]) -> NameOrgResult {
        let config = ExtractorConfig::default();
        EntityExtractor::new(recognizer, &config).extract_name_and_org(pages).unwrap()
    }

    #[test]
    fn single_word_person_is_never_an_author() {
        let recognizer = ScriptedRecognizer::new().with_page("Ravi wrote it", &[("Ravi", Person)]);
        assert!(run(&recognizer, &["Ravi wrote it"]).author_names.is_empty());
    }

    #[test]
    fn two_to_four_word_person_on_first_page_is_an_author() {
        let page = "Jane Doe and Ravi Kumar Sharma Iyer with A B C D E";
        let recognizer = ScriptedRecognizer::new().with_page(
            page,
            &[("Jane Doe", Person), ("Ravi Kumar Sharma Iyer", Person), ("A B C D E", Person)],
        );
        let result = run(&recognizer, &[page]);
        assert_eq!(result.author_names.as_slice(), &["jane doe".to_string(), "ravi kumar sharma iyer".to_string()]);
    }

    #[test]
    fn person_form_strips_digits_before_counting() {
        let recognizer = ScriptedRecognizer::new().with_page("by John 3M Smith", &[("John 3M Smith", Person)]);
        let result = run(&recognizer, &["by John 3M Smith"]);
        assert_eq!(result.author_names.as_slice(), &["john m smith".to_string()]);
    }

    #[test]
    fn later_page_organization_is_not_an_author_org() {
        let pages = ["cover", "p1", "p2", "p3", "p4", "HDFC Bank Ltd results"];
        let recognizer = ScriptedRecognizer::new().with_page(pages[5], &[("HDFC Bank Ltd", Org)]);
        let result = run(&recognizer, &pages);
        assert_eq!(result.all_orgs.as_slice(), &["hdfc bank ltd".to_string()]);
        assert!(result.author_orgs.is_empty());
    }

    #[test]
    fn persons_after_author_pages_are_dropped() {
        let pages = ["a", "b", "c", "Jane Doe"];
        let recognizer = ScriptedRecognizer::new().with_page(pages[3], &[("Jane Doe", Person)]);
        assert!(run(&recognizer, &pages).author_names.is_empty());
    }

    #[test]
    fn organization_word_bounds_apply() {
        let page = "Infosys; Kotak Institutional Equities; One Two Three Four Five Six Seven";
        let recognizer = ScriptedRecognizer::new().with_page(
            page,
            &[("Infosys", Org), ("Kotak Institutional Equities", Org), ("One Two Three Four Five Six Seven", Org)],
        );
        let result = run(&recognizer, &[page]);
        assert_eq!(result.all_orgs.as_slice(), &["kotak institutional equities".to_string()]);
        assert_eq!(result.author_orgs, result.all_orgs);
    }

    #[test]
    fn organization_keeps_digits() {
        let recognizer = ScriptedRecognizer::new().with_page("3M India Ltd.", &[("3M India Ltd.", Org)]);
        assert_eq!(run(&recognizer, &["3M India Ltd."]).all_orgs.as_slice(), &["3m india ltd".to_string()]);
    }

    #[test]
    fn identical_mentions_on_two_pages_dedup() {
        let pages = ["Kotak Securities Ltd", "Kotak Securities Ltd "];
        let recognizer = ScriptedRecognizer::new()
            .with_page(pages[0], &[("Kotak Securities Ltd", Org)])
            .with_page(pages[1], &[("Kotak Securities Ltd", Org)]);
        let result = run(&recognizer, &pages);
        assert_eq!(result.all_orgs.len(), 1);
        assert_eq!(result.author_orgs.len(), 1);
    }

    #[test]
    fn other_kinds_are_ignored() {
        let recognizer = ScriptedRecognizer::new().with_page("New Delhi India", &[("New Delhi India", Other)]);
        assert_eq!(run(&recognizer, &["New Delhi India"]), NameOrgResult::default());
    }

    #[test]
    fn extraction_is_idempotent() {
        let pages = ["Jane Doe of Kotak Securities"];
        let recognizer = ScriptedRecognizer::new()
            .with_page(pages[0], &[("Jane Doe", Person), ("Kotak Securities", Org)]);
        assert_eq!(run(&recognizer, &pages), run(&recognizer, &pages));
    }

    #[test]
    fn uninitialized_recognizer_fails_even_without_pages() {
        let recognizer = ScriptedRecognizer::uninitialized();
        let config = ExtractorConfig::default();
        let result = EntityExtractor::new(&recognizer, &config).extract_name_and_org::<&str>(&[]);
        assert!(matches!(result, Err(ExtractError::ModelNotInitialized)));
    }
}
