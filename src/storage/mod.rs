// src/storage/mod.rs
use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::extractors::DocumentFacts;
use crate::utils::error::StorageError;

pub const NAME_ORG_REPORT: &str = "Name_Org_Results.csv";
pub const PRICE_REPORT: &str = "Target_Price_Reco_Results.csv";
pub const RUN_SUMMARY: &str = "run_summary.json";

const NAME_ORG_HEADER: [&str; 5] = [
    "File Name",
    "Author Name - Through Email",
    "Author Name - Through Entity Tagging",
    "Author Institution - Through Entity Tagging",
    "All Companies - Through Entity Tagging",
];

const PRICE_HEADER: [&str; 4] = ["File Name", "Target Price", "Recommendation", "Price - Recommendation Mapping"];

#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    pub file: String,
    pub reason: String,
}

/// What happened during one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_dir: String,
    pub started_at: String,
    pub finished_at: String,
    pub processed: Vec<String>,
    pub failed: Vec<FailedDocument>,
}

impl RunSummary {
    pub fn start(input_dir: &Path) -> Self {
        Self {
            input_dir: input_dir.display().to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            finished_at: String::new(),
            processed: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn record_success(&mut self, file: impl Into<String>) {
        self.processed.push(file.into());
    }

    pub fn record_failure(&mut self, file: impl Into<String>, reason: impl ToString) {
        self.failed.push(FailedDocument { file: file.into(), reason: reason.to_string() });
    }

    pub fn finish(&mut self) {
        self.finished_at = chrono::Utc::now().to_rfc3339();
    }
}

fn json_cell<T: Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::SerializationError(e.to_string()))
}

/// One CSV record, quoted and newline-terminated, ready to append.
fn encode_row<I, T>(row: I) -> Result<Vec<u8>, StorageError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(row)?;
    writer.into_inner().map_err(|e| StorageError::SerializationError(e.to_string()))
}

fn create_report(path: &Path, header: &[&str]) -> Result<File, StorageError> {
    let mut file = File::create(path)?;
    file.write_all(&encode_row(header)?)?;
    file.flush()?;
    Ok(file)
}

/// Writes the two per-document reports and the run summary.
pub struct ReportWriter {
    base_dir: PathBuf,
    names: File,
    prices: File,
}

impl ReportWriter {
    /// Creates the output directory if needed and starts both reports with their header rows.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        let names = create_report(&base_path.join(NAME_ORG_REPORT), &NAME_ORG_HEADER)?;
        let prices = create_report(&base_path.join(PRICE_REPORT), &PRICE_HEADER)?;

        tracing::info!("Writing reports to {}", base_path.display());
        Ok(Self { base_dir: base_path, names, prices })
    }

    /// Appends one row to each report. Both rows are encoded before anything is
    /// written, and a failed append truncates both reports back to where they
    /// were, so a failure leaves no partial row behind.
    pub fn write_document(&mut self, facts: &DocumentFacts) -> Result<(), StorageError> {
        let names_row = encode_row(&[
            facts.file_name.clone(),
            json_cell(&facts.email_names)?,
            json_cell(&facts.names_and_orgs.author_names)?,
            json_cell(&facts.names_and_orgs.author_orgs)?,
            json_cell(&facts.names_and_orgs.all_orgs)?,
        ])?;
        let prices_row = encode_row(&[
            facts.file_name.clone(),
            json_cell(&facts.prices.all_prices)?,
            json_cell(&facts.prices.all_recommendations)?,
            json_cell(&facts.prices.price_to_recommendations)?,
        ])?;

        let names_end = self.names.stream_position()?;
        let prices_end = self.prices.stream_position()?;
        let appended = append(&mut self.names, &names_row).and_then(|_| append(&mut self.prices, &prices_row));
        if let Err(e) = appended {
            tracing::warn!("Rolling back report rows for {}", facts.file_name);
            truncate(&mut self.names, names_end)?;
            truncate(&mut self.prices, prices_end)?;
            return Err(e.into());
        }

        tracing::debug!("Wrote report rows for {}", facts.file_name);
        Ok(())
    }

    pub fn save_run_summary(&self, summary: &RunSummary) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(RUN_SUMMARY);
        let summary_str = serde_json::to_string_pretty(summary)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, summary_str)?;

        tracing::info!("Saved run summary to {}", file_path.display());
        Ok(file_path)
    }
}

fn append(file: &mut File, row: &[u8]) -> std::io::Result<()> {
    file.write_all(row)?;
    file.flush()
}

fn truncate(file: &mut File, len: u64) -> std::io::Result<()> {
    file.set_len(len)?;
    file.seek(SeekFrom::Start(len))?;
    Ok(())
}
