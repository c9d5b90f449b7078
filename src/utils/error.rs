// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Entity recognizer used before its gazetteer patterns were loaded")]
    ModelNotInitialized,
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Could not read document {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl DocumentError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DocumentError::Unreadable { path: path.into(), reason: reason.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to load dataset {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Dataset {path} has no column named '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Document could not be loaded: {0}")]
    Document(#[from] DocumentError),

    #[error("Gazetteer dataset failed: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
