// src/extractors/config.rs
use std::ops::RangeInclusive;

// --- Constants ---
/// Characters scanned before an email address for the owner's name.
pub const EMAIL_NAME_WINDOW: usize = 100;
/// Consecutive proper nouns needed before a run counts as a name.
pub const MIN_PROPER_NOUN_RUN: usize = 2;
/// Author names and author organizations come from pages [0, 3).
pub const AUTHOR_PAGE_LIMIT: usize = 3;
pub const ORGANIZATION_WORDS: RangeInclusive<usize> = 2..=6;
pub const PERSON_WORDS: RangeInclusive<usize> = 2..=4;
/// Characters after a price anchor searched for the price.
pub const PRICE_WINDOW: usize = 15;
/// Characters on each side of a price anchor searched for recommendations.
pub const RECOMMENDATION_WINDOW: usize = 50;

pub const ANCHOR_PHRASES: &[&str] = &["target price", "price target"];

pub const RECOMMENDATION_KEYWORDS: &[&str] = &[
    "buy",
    "sell",
    "neutral",
    "add",
    "reduce",
    "hold",
    "outperform",
    "maintain",
    "peer perform",
    "mkt perform",
    "recomm list",
    "equal weight",
];

/// How repeated prices are recorded in the price→recommendations mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceEntryPolicy {
    /// One entry per anchor occurrence; only an identical (price, recommendations)
    /// pair is skipped.
    #[default]
    PerOccurrence,
    /// One entry per price; later recommendations are merged into it.
    MergeByPrice,
}

/// Window sizes, page limits and bounds used by the extractors.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub email_name_window: usize,
    pub min_proper_noun_run: usize,
    pub author_page_limit: usize,
    pub organization_words: RangeInclusive<usize>,
    pub person_words: RangeInclusive<usize>,
    pub price_window: usize,
    pub recommendation_window: usize,
    pub anchor_phrases: Vec<String>,
    pub recommendation_keywords: Vec<String>,
    pub price_entry_policy: PriceEntryPolicy,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            email_name_window: EMAIL_NAME_WINDOW,
            min_proper_noun_run: MIN_PROPER_NOUN_RUN,
            author_page_limit: AUTHOR_PAGE_LIMIT,
            organization_words: ORGANIZATION_WORDS,
            person_words: PERSON_WORDS,
            price_window: PRICE_WINDOW,
            recommendation_window: RECOMMENDATION_WINDOW,
            anchor_phrases: ANCHOR_PHRASES.iter().map(|s| s.to_string()).collect(),
            recommendation_keywords: RECOMMENDATION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            price_entry_policy: PriceEntryPolicy::default(),
        }
    }
}

impl ExtractorConfig {
    pub fn is_author_page(&self, page_index: usize) -> bool {
        page_index < self.author_page_limit
    }
}
