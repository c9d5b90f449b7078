// src/extractors/mod.rs
pub mod config;
pub mod email_names;
pub mod entities;
pub mod price;

use serde::Serialize;

use crate::document::Document;
use crate::nlp::EntityRecognizer;
use crate::utils::error::ExtractError;
use crate::utils::OrderedSet;

// Re-export key extraction types for convenience
pub use config::{ExtractorConfig, PriceEntryPolicy};
pub use email_names::EmailNameExtractor;
pub use entities::{EntityExtractor, NameOrgResult};
pub use price::{PriceExtractor, PriceResult};

/// Everything extracted from one document; becomes one row in each report.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFacts {
    pub file_name: String,
    pub page_count: usize,
    pub email_names: OrderedSet,
    pub names_and_orgs: NameOrgResult,
    pub prices: PriceResult,
}

/// Runs the three extractors over a loaded document.
pub struct DocumentExtractor<'a> {
    recognizer: &'a dyn EntityRecognizer,
    config: &'a ExtractorConfig,
}

impl<'a> DocumentExtractor<'a> {
    pub fn new(recognizer: &'a dyn EntityRecognizer, config: &'a ExtractorConfig) -> Self {
        Self { recognizer, config }
    }

    pub fn extract(&self, document: &Document) -> Result<DocumentFacts, ExtractError> {
        let pages = document.pages();
        for page in pages.iter().filter(|page| page.text.trim().is_empty()) {
            tracing::debug!("{}: page {} has no text", document.file_name(), page.index);
        }

        let names_and_orgs = EntityExtractor::new(self.recognizer, self.config).extract_name_and_org(pages)?;
        let email_names = EmailNameExtractor::new(self.recognizer, self.config).extract_names_near_emails(pages)?;
        let prices = PriceExtractor::new(self.config).extract_price_and_recommendations(pages);

        tracing::info!(
            "{}: {} email names, {} author names, {} author orgs, {} orgs, {} prices",
            document.file_name(),
            email_names.len(),
            names_and_orgs.author_names.len(),
            names_and_orgs.author_orgs.len(),
            names_and_orgs.all_orgs.len(),
            prices.all_prices.len()
        );

        Ok(DocumentFacts {
            file_name: document.file_name(),
            page_count: document.page_count(),
            email_names,
            names_and_orgs,
            prices,
        })
    }
}
