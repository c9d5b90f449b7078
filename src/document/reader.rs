// src/document/reader.rs
use std::fs;
use std::path::Path;

use crate::document::models::Document;
use crate::utils::error::DocumentError;

/// Form feed, the page separator `pdftotext` writes between pages.
const PAGE_BREAK: char = '\x0c';

/// Turns a document on disk into its ordered per-page text.
pub trait PageSource {
    /// Returns true if this source knows how to read `path`.
    fn supports(&self, path: &Path) -> bool;

    fn get_pages(&self, path: &Path) -> Result<Document, DocumentError>;
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

/// Reads PDF files with lopdf, one text string per page.
#[derive(Debug, Default)]
pub struct PdfPageSource;

impl PageSource for PdfPageSource {
    fn supports(&self, path: &Path) -> bool {
        has_extension(path, "pdf")
    }

    fn get_pages(&self, path: &Path) -> Result<Document, DocumentError> {
        let pdf = lopdf::Document::load(path).map_err(|e| DocumentError::unreadable(path, e))?;

        let mut page_texts = Vec::new();
        for (page_number, _page_id) in pdf.get_pages() {
            // A page whose content stream cannot be decoded keeps its slot so
            // later page indices stay aligned.
            let text = match pdf.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Could not extract text from page {} of {}: {}", page_number, path.display(), e);
                    String::new()
                }
            };
            page_texts.push(text);
        }

        tracing::debug!("Loaded {} pages from {}", page_texts.len(), path.display());
        Ok(Document::new(path, page_texts))
    }
}

/// Reads plain-text dumps where pages are separated by form feeds.
#[derive(Debug, Default)]
pub struct TextPageSource;

impl PageSource for TextPageSource {
    fn supports(&self, path: &Path) -> bool {
        has_extension(path, "txt")
    }

    fn get_pages(&self, path: &Path) -> Result<Document, DocumentError> {
        let content = fs::read_to_string(path).map_err(|e| DocumentError::unreadable(path, e))?;

        let mut page_texts: Vec<String> = content.split(PAGE_BREAK).map(str::to_string).collect();
        // pdftotext terminates the last page with a form feed as well
        if page_texts.len() > 1 && page_texts.last().map(|p| p.trim().is_empty()).unwrap_or(false) {
            page_texts.pop();
        }

        tracing::debug!("Loaded {} pages from {}", page_texts.len(), path.display());
        Ok(Document::new(path, page_texts))
    }
}

/// Dispatches to the first source that supports the file's extension.
pub struct AnyPageSource {
    sources: Vec<Box<dyn PageSource + Send + Sync>>,
}

impl AnyPageSource {
    pub fn new() -> Self {
        Self {
            sources: vec![Box::new(PdfPageSource), Box::new(TextPageSource)],
        }
    }
}

impl Default for AnyPageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for AnyPageSource {
    fn supports(&self, path: &Path) -> bool {
        self.sources.iter().any(|source| source.supports(path))
    }

    fn get_pages(&self, path: &Path) -> Result<Document, DocumentError> {
        let source = self
            .sources
            .iter()
            .find(|source| source.supports(path))
            .ok_or_else(|| DocumentError::UnsupportedFormat(path.to_path_buf()))?;
        source.get_pages(path)
    }
}
