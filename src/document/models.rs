// src/document/models.rs
use std::path::{Path, PathBuf};

/// One page of extracted text, indexed from 0 in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub text: String,
}

impl AsRef<str> for Page {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// A loaded document. Immutable once built by a page source.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    pages: Vec<Page>,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, page_texts: Vec<String>) -> Self {
        let pages = page_texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Page { index, text })
            .collect();
        Self { path: path.into(), pages }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used as the report row key.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
