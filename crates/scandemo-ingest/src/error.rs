//! Error types for input discovery and table loading.

use std::path::PathBuf;

use scandemo_model::ModelError;
use thiserror::Error;

/// Errors that can occur while reading run inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input directory holds no regular file to name the outputs after.
    #[error("no input file found in {path}")]
    NoInputFile { path: PathBuf },

    /// Table file not found.
    #[error("table not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to parse a table with Polars.
    #[error("failed to parse table {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Table has no columns.
    #[error("table is empty: {path}")]
    EmptyTable { path: PathBuf },

    /// Table has a blank column name.
    #[error("table {path} has an empty column name")]
    EmptyColumnName { path: PathBuf },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
