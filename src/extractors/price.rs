// src/extractors/price.rs
//! Target price and analyst recommendation around "target price" anchors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::extractors::config::{ExtractorConfig, PriceEntryPolicy};
use crate::utils::text::{char_window, flatten_page};
use crate::utils::OrderedSet;

// --- Regex Patterns ---
// Optional "(", currency letters ("rs.", "inr "), then a grouped number: "rs.1,100", "(24"
static PRICE_CANDIDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?[a-zA-Z .`~]*\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{3})*")
        .expect("Failed to compile PRICE_CANDIDATE_RE")
});

// The number alone: 1-3 digits, then only whole 3-digit groups ("2,450.50" -> "2,450")
static PRICE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{3})*").expect("Failed to compile PRICE_NUMBER_RE")
});

/// One anchor occurrence: the price found next to it and the recommendations around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRecommendation {
    pub price: String,
    pub recommendations: Vec<String>,
}

// Serialized as a single-key object: {"1,100": ["buy"]}
impl Serialize for PriceRecommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.price, &self.recommendations)?;
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceResult {
    pub price_to_recommendations: Vec<PriceRecommendation>,
    pub all_prices: OrderedSet,
    pub all_recommendations: OrderedSet,
}

/// First price in `window`, or `None` when no number follows the anchor.
pub fn extract_target_price(window: &str) -> Option<String> {
    let candidate = PRICE_CANDIDATE_RE.find(window)?;
    PRICE_NUMBER_RE
        .find(candidate.as_str())
        .map(|number| number.as_str().to_string())
}

/// Every keyword present anywhere in `window` (case-insensitive), in keyword order.
pub fn extract_recommendations<K: AsRef<str>>(window: &str, keywords: &[K]) -> Vec<String> {
    let window = window.to_lowercase();
    let mut found: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref();
        if window.contains(keyword) && !found.iter().any(|k| k == keyword) {
            found.push(keyword.to_string());
        }
    }
    found
}

pub struct PriceExtractor<'a> {
    config: &'a ExtractorConfig,
}

impl<'a> PriceExtractor<'a> {
    pub fn new(config: &'a ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn extract_price_and_recommendations<S: AsRef<str>>(&self, pages: &[S]) -> PriceResult {
        let mut result = PriceResult::default();

        for (page_index, page) in pages.iter().enumerate() {
            let text = flatten_page(page.as_ref());

            for anchor in &self.config.anchor_phrases {
                for (start, matched) in text.match_indices(anchor.as_str()) {
                    let end = start + matched.len();

                    let price_window = char_window(&text, start, end, 0, self.config.price_window);
                    let window = self.config.recommendation_window;
                    let reco_window = char_window(&text, start, end, window, window);

                    let Some(price) = extract_target_price(price_window) else {
                        tracing::trace!("Page {}: '{}' at {} has no price", page_index, anchor, start);
                        continue;
                    };
                    let recommendations = extract_recommendations(reco_window, &self.config.recommendation_keywords);
                    tracing::debug!("Page {}: '{}' -> price {} {:?}", page_index, anchor, price, recommendations);

                    result.all_prices.insert(price.clone());
                    result.all_recommendations.extend(recommendations.iter().cloned());
                    self.record_entry(&mut result.price_to_recommendations, price, recommendations);
                }
            }
        }

        result
    }

    fn record_entry(&self, entries: &mut Vec<PriceRecommendation>, price: String, recommendations: Vec<String>) {
        match self.config.price_entry_policy {
            PriceEntryPolicy::PerOccurrence => {
                let entry = PriceRecommendation { price, recommendations };
                if !entries.contains(&entry) {
                    entries.push(entry);
                }
            }
            PriceEntryPolicy::MergeByPrice => {
                match entries.iter_mut().find(|entry| entry.price == price) {
                    Some(entry) => {
                        for recommendation in recommendations {
                            if !entry.recommendations.contains(&recommendation) {
                                entry.recommendations.push(recommendation);
                            }
                        }
                    }
                    None => entries.push(PriceRecommendation { price, recommendations }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::config::RECOMMENDATION_KEYWORDS;

    fn extract(pages: &[&str]) -> PriceResult {
        let config = ExtractorConfig::default();
        PriceExtractor::new(&config).extract_price_and_recommendations(pages)
    }

    fn entry(price: &str, recommendations: &[&str]) -> PriceRecommendation {
        PriceRecommendation {
            price: price.to_string(),
            recommendations: recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn price_follows_currency_prefix() {
        assert_eq!(extract_target_price("target price rs.1,100 (24 %"), Some("1,100".to_string()));
        assert_eq!(extract_target_price("price target of inr 2,450.50"), Some("2,450".to_string()));
        assert_eq!(extract_target_price("target price: 850"), Some("850".to_string()));
    }

    #[test]
    fn decimal_and_short_tails_are_dropped() {
        assert_eq!(extract_target_price("target price rs 2,450.50"), Some("2,450".to_string()));
        assert_eq!(extract_target_price("target price rs 1,10 bn"), Some("1".to_string()));
        assert_eq!(extract_target_price("target price 99.90"), Some("99".to_string()));
        assert_eq!(extract_target_price("target price rs 12,34,567"), Some("12".to_string()));
    }

    #[test]
    fn no_number_means_no_price() {
        assert_eq!(extract_target_price("target price unchanged"), None);
    }

    #[test]
    fn recommendations_ignore_case_and_follow_keyword_order() {
        let window = "We remain Outperform on the stock; BUY for long-term investors with a target ahead";
        assert_eq!(extract_recommendations(window, RECOMMENDATION_KEYWORDS), vec!["buy", "outperform"]);
    }

    #[test]
    fn recommendations_are_substring_matches() {
        // "address" contains "add"
        let found = extract_recommendations("see address below, mkt perform", RECOMMENDATION_KEYWORDS);
        assert_eq!(found, vec!["add", "mkt perform"]);
    }

    #[test]
    fn end_to_end_price_and_rating() {
        let result = extract(&["Rating: BUY\nTarget Price Rs.1,100 (24 % upside)"]);
        assert_eq!(result.price_to_recommendations, vec![entry("1,100", &["buy"])]);
        assert_eq!(result.all_prices.as_slice(), &["1,100".to_string()]);
        assert_eq!(result.all_recommendations.as_slice(), &["buy".to_string()]);
    }

    #[test]
    fn anchor_split_across_lines_still_matches() {
        let result = extract(&["HOLD with price \ntarget 420"]);
        assert_eq!(result.price_to_recommendations, vec![entry("420", &["hold"])]);
    }

    #[test]
    fn anchor_at_page_start_is_handled() {
        let result = extract(&["target price 640, reduce"]);
        assert_eq!(result.price_to_recommendations, vec![entry("640", &["reduce"])]);
    }

    #[test]
    fn anchor_without_price_contributes_nothing() {
        let result = extract(&["we buy the argument but leave the target price unchanged"]);
        assert_eq!(result, PriceResult::default());
    }

    #[test]
    fn price_window_is_fifteen_characters() {
        // The number starts 16 characters after the anchor
        let result = extract(&["target price               999"]);
        assert!(result.all_prices.is_empty());
    }

    #[test]
    fn same_price_with_different_ratings_keeps_both_entries() {
        let page = format!("buy: target price 500 {} price target 500 sell", "-".repeat(120));
        let result = extract(&[page.as_str()]);
        assert_eq!(result.price_to_recommendations, vec![entry("500", &["buy"]), entry("500", &["sell"])]);
        assert_eq!(result.all_prices.len(), 1);
    }

    #[test]
    fn identical_entries_are_kept_once() {
        let result = extract(&["buy, target price 500", "buy, target price 500"]);
        assert_eq!(result.price_to_recommendations, vec![entry("500", &["buy"])]);
    }

    #[test]
    fn merge_policy_folds_entries_by_price() {
        let config = ExtractorConfig { price_entry_policy: PriceEntryPolicy::MergeByPrice, ..Default::default() };
        let page = format!("buy: target price 500 {} price target 500 sell", "-".repeat(120));
        let result = PriceExtractor::new(&config).extract_price_and_recommendations(&[page]);
        assert_eq!(result.price_to_recommendations, vec![entry("500", &["buy", "sell"])]);
    }

    #[test]
    fn mapping_serializes_as_single_key_objects() {
        let json = serde_json::to_string(&vec![entry("1,100", &["buy"])]).unwrap();
        assert_eq!(json, r#"[{"1,100":["buy"]}]"#);
    }

    #[test]
    fn extraction_is_idempotent() {
        let pages = ["Maintain BUY, target price rs 1,250; price target raised"];
        assert_eq!(extract(&pages), extract(&pages));
    }
}
