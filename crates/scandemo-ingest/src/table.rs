//! Loading of the single-subject tables written by the analysis script.

use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Delimiter of an analysis table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Tab-separated (cortical thickness tables).
    Tsv,
    /// Comma-separated (volume and QC tables).
    Csv,
}

impl TableFormat {
    #[must_use]
    pub const fn separator(self) -> u8 {
        match self {
            Self::Tsv => b'\t',
            Self::Csv => b',',
        }
    }
}

/// Reads a delimited table with a single header row into a DataFrame.
///
/// The row count is not checked here; the assembler rejects tables that do
/// not hold exactly one row.
pub fn read_table(path: &Path, format: TableFormat) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .with_parse_options(CsvParseOptions::default().with_separator(format.separator()))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    }
    if df
        .get_column_names()
        .iter()
        .any(|name| name.trim().is_empty())
    {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded analysis table"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_table(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn reads_tab_separated_table() {
        let file = create_temp_table(
            "lh.aparc.thickness\tlh_bankssts_thickness\tlh_cuneus_thickness\n\
             sub-001\t2.5\t1.9\n",
        );
        let df = read_table(file.path(), TableFormat::Tsv).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(
            df.get_column_names_str(),
            vec![
                "lh.aparc.thickness",
                "lh_bankssts_thickness",
                "lh_cuneus_thickness"
            ]
        );
    }

    #[test]
    fn reads_comma_separated_table() {
        let file = create_temp_table("subject,total intracranial,left cerebral cortex\nsub-001,1400000,250000\n");
        let df = read_table(file.path(), TableFormat::Csv).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn wrong_separator_yields_single_column() {
        let file = create_temp_table("a\tb\n1\t2\n");
        let df = read_table(file.path(), TableFormat::Csv).unwrap();
        assert_eq!(df.width(), 1);
    }

    #[test]
    fn keeps_every_row() {
        let file = create_temp_table("a,b\n1,2\n3,4\n");
        let df = read_table(file.path(), TableFormat::Csv).unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(&dir.path().join("synthseg.vol.csv"), TableFormat::Csv);
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
