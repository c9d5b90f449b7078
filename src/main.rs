// src/main.rs
mod document;
mod extractors;
mod nlp;
mod storage;
mod utils;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use document::{AnyPageSource, PageSource};
use extractors::config::AUTHOR_PAGE_LIMIT;
use extractors::{DocumentExtractor, DocumentFacts, ExtractorConfig, PriceEntryPolicy};
use nlp::gazetteer::{
    DEFAULT_COMPANY_COLUMN, DEFAULT_COMPANY_DATASETS, DEFAULT_PERSON_COLUMN, DEFAULT_PERSON_DATASETS,
};
use nlp::{GazetteerBuilder, RuleRecognizer};
use storage::{ReportWriter, RunSummary};
use utils::AppError;

/// Extracts authors, organizations, target prices and recommendations from financial reports
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the reports (.pdf, or .txt with form-feed page breaks)
    #[arg(short, long, default_value = "./pdf_docs")]
    input_dir: PathBuf,

    /// Output directory for the CSV reports and run summary
    #[arg(short, long, default_value = "./results")]
    output_dir: PathBuf,

    /// CSV file of known person names (repeatable)
    #[arg(long = "person-names", default_values = DEFAULT_PERSON_DATASETS)]
    person_names: Vec<PathBuf>,

    /// CSV file of known company names (repeatable)
    #[arg(long = "company-names", default_values = DEFAULT_COMPANY_DATASETS)]
    company_names: Vec<PathBuf>,

    /// Skip the name datasets and tag with capitalization rules only
    #[arg(long)]
    no_gazetteer: bool,

    /// Column holding the name in person datasets
    #[arg(long, default_value = DEFAULT_PERSON_COLUMN)]
    person_column: String,

    /// Column holding the name in company datasets
    #[arg(long, default_value = DEFAULT_COMPANY_COLUMN)]
    company_column: String,

    /// Number of leading pages searched for the author and author organization
    #[arg(long, default_value_t = AUTHOR_PAGE_LIMIT)]
    author_pages: usize,

    /// Keep one price→recommendations entry per price instead of one per anchor
    #[arg(long)]
    merge_price_entries: bool,

    /// Debug-level logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            author_page_limit: self.author_pages,
            price_entry_policy: if self.merge_price_entries {
                PriceEntryPolicy::MergeByPrice
            } else {
                PriceEntryPolicy::PerOccurrence
            },
            ..ExtractorConfig::default()
        }
    }
}

/// Builds the recognizer once; dataset failures are fatal.
fn build_recognizer(args: &Args) -> Result<RuleRecognizer, AppError> {
    let patterns = if args.no_gazetteer {
        tracing::warn!("Gazetteer disabled; tagging relies on capitalization rules only");
        Vec::new()
    } else {
        GazetteerBuilder::new()
            .person_files(args.person_names.iter().cloned())
            .company_files(args.company_names.iter().cloned())
            .person_column(args.person_column.as_str())
            .company_column(args.company_column.as_str())
            .build_patterns()?
    };
    let recognizer = RuleRecognizer::with_patterns(patterns);
    tracing::info!("Recognizer ready with {} gazetteer patterns", recognizer.pattern_count());
    Ok(recognizer)
}

/// Supported files directly inside `dir`, sorted by name.
fn list_documents(dir: &Path, source: &dyn PageSource) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && source.supports(&path) {
            files.push(path);
        } else {
            tracing::trace!("Skipping {}", path.display());
        }
    }
    files.sort();
    Ok(files)
}

fn process_document(
    path: &Path,
    source: &dyn PageSource,
    extractor: &DocumentExtractor<'_>,
) -> Result<DocumentFacts, AppError> {
    let document = source.get_pages(path)?;
    tracing::debug!("{} has {} pages", document.path().display(), document.page_count());
    Ok(extractor.extract(&document)?)
}

fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments and setup logging (reads RUST_LOG env var)
    let args = Args::parse();
    utils::logging::setup_logging(if args.verbose { "debug" } else { "info" });
    tracing::info!("Starting processing for args: {:?}", args);

    if !args.input_dir.is_dir() {
        return Err(AppError::Config(format!("Input directory {} does not exist", args.input_dir.display())));
    }

    // 2. Initialize the recognizer and extractors
    let recognizer = build_recognizer(&args)?;
    let config = args.extractor_config();
    let extractor = DocumentExtractor::new(&recognizer, &config);
    let source = AnyPageSource::new();

    // 3. Initialize report storage
    let mut writer = ReportWriter::new(&args.output_dir)?;
    let mut summary = RunSummary::start(&args.input_dir);

    // 4. Process each document; a failing document is logged and skipped
    let documents = list_documents(&args.input_dir, &source)?;
    tracing::info!("Found {} documents in {}", documents.len(), args.input_dir.display());

    for (count, path) in documents.iter().enumerate() {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::info!("[{}/{}] Processing {}", count + 1, documents.len(), file_name);

        let outcome = process_document(path, &source, &extractor)
            .and_then(|facts| writer.write_document(&facts).map_err(AppError::from));

        match outcome {
            Ok(()) => summary.record_success(file_name),
            Err(e) => {
                tracing::error!("Failed to process {}: {}", path.display(), e);
                summary.record_failure(file_name, e);
            }
        }
    }

    summary.finish();
    if let Err(e) = writer.save_run_summary(&summary) {
        tracing::error!("Failed to save run summary: {}", e);
    }

    let (success_count, failure_count) = (summary.processed.len(), summary.failed.len());
    tracing::info!("Processing finished. Success: {}, Failures: {}", success_count, failure_count);

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!("Failed to extract facts from any of {} documents", failure_count)));
    }

    Ok(())
}
