use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    /// A supplied table does not line up with the one-row demographic record.
    #[error("table {index} has {found} rows, expected {expected}")]
    RowCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Two supplied tables carry the same column with different values.
    #[error("column {name:?} appears in more than one table with different values")]
    DuplicateColumn { name: String },

    /// The output path was already written during this run.
    #[error("output {path} was already written in this run")]
    DuplicateOutput { path: PathBuf },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataframe operation failed: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, OutputError>;
