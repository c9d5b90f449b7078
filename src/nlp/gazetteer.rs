// src/nlp/gazetteer.rs
//! Loads reference name lists into exact-match recognizer patterns.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;

use crate::nlp::EntityKind;
use crate::utils::error::DatasetError;

pub const DEFAULT_PERSON_COLUMN: &str = "name";
pub const DEFAULT_COMPANY_COLUMN: &str = "Company Name";

/// Datasets loaded when no `--person-names` is given, relative to the working directory.
pub const DEFAULT_PERSON_DATASETS: [&str; 3] = [
    "Dataset-Indian-Names/Indian-Male-Names.csv",
    "Dataset-Indian-Names/Indian-Female-Names.csv",
    "Dataset-Indian-Names/Indian_Names.csv",
];
pub const DEFAULT_COMPANY_DATASETS: [&str; 1] = ["Company_Names_Dataset/bse_companies.csv"];

/// A known name the recognizer must tag whenever the exact string appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPattern {
    pub kind: EntityKind,
    pub pattern: String,
}

/// Wraps every name of one kind as a recognizer pattern.
pub fn entity_patterns<I, S>(names: I, kind: EntityKind) -> Vec<EntityPattern>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(|name| EntityPattern { kind, pattern: name.into() })
        .collect()
}

/// Reads person and company reference datasets (CSV, ISO-8859-1).
#[derive(Debug, Clone)]
pub struct GazetteerBuilder {
    person_files: Vec<PathBuf>,
    company_files: Vec<PathBuf>,
    person_column: String,
    company_column: String,
}

impl Default for GazetteerBuilder {
    fn default() -> Self {
        Self {
            person_files: Vec::new(),
            company_files: Vec::new(),
            person_column: DEFAULT_PERSON_COLUMN.to_string(),
            company_column: DEFAULT_COMPANY_COLUMN.to_string(),
        }
    }
}

impl GazetteerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person_files(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.person_files.extend(files);
        self
    }

    pub fn company_files(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.company_files.extend(files);
        self
    }

    pub fn person_column(mut self, column: impl Into<String>) -> Self {
        self.person_column = column.into();
        self
    }

    pub fn company_column(mut self, column: impl Into<String>) -> Self {
        self.company_column = column.into();
        self
    }

    pub fn load_person_names(&self) -> Result<Vec<String>, DatasetError> {
        load_names(&self.person_files, &self.person_column)
    }

    pub fn load_company_names(&self) -> Result<Vec<String>, DatasetError> {
        load_names(&self.company_files, &self.company_column)
    }

    /// Person patterns first, then organization patterns.
    pub fn build_patterns(&self) -> Result<Vec<EntityPattern>, DatasetError> {
        let persons = self.load_person_names()?;
        let companies = self.load_company_names()?;
        tracing::info!("Loaded {} person names and {} company names", persons.len(), companies.len());

        let mut patterns = entity_patterns(persons, EntityKind::Person);
        patterns.extend(entity_patterns(companies, EntityKind::Organization));
        Ok(patterns)
    }
}

fn load_names(files: &[PathBuf], column: &str) -> Result<Vec<String>, DatasetError> {
    let mut names = Vec::new();
    for file in files {
        let loaded = read_column(file, column)?;
        tracing::debug!("Read {} values from column '{}' of {}", loaded.len(), column, file.display());
        names.extend(loaded);
    }
    Ok(names)
}

fn load_error(path: &Path, reason: impl ToString) -> DatasetError {
    DatasetError::Load { path: path.to_path_buf(), reason: reason.to_string() }
}

/// Reads one named column of a CSV file, skipping blank cells.
fn read_column(path: &Path, column: &str) -> Result<Vec<String>, DatasetError> {
    let bytes = fs::read(path).map_err(|e| load_error(path, e))?;
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| load_error(path, e))?.clone();
    let index = headers
        .iter()
        .position(|header| {
            // a UTF-8 BOM read as Latin-1 shows up as "ï»¿"
            header.trim_start_matches('\u{feff}').trim_start_matches("ï»¿").trim() == column
        })
        .ok_or_else(|| DatasetError::MissingColumn { path: path.to_path_buf(), column: column.to_string() })?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| load_error(path, e))?;
        if let Some(value) = record.get(index).map(str::trim) {
            if !value.is_empty() {
                values.push(value.to_string());
            }
        }
    }
    Ok(values)
}
