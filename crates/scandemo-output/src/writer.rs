//! CSV output writing.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use scandemo_model::{AcquisitionId, OutputKind};
use tracing::info;

use crate::error::{OutputError, Result};
use crate::naming::output_path;

/// Writes a DataFrame as comma-separated text with a header row.
///
/// Existing files are overwritten.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;
    Ok(())
}

/// Writes the outputs of one run, at most once per path.
#[derive(Debug)]
pub struct OutputWriter {
    root: PathBuf,
    written: BTreeSet<PathBuf>,
}

impl OutputWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: BTreeSet::new(),
        }
    }

    /// Paths written so far, sorted.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.written.iter().map(PathBuf::as_path)
    }

    /// Writes `df` as the `kind` output of `id` and returns its path.
    pub fn write(
        &mut self,
        id: &AcquisitionId,
        kind: OutputKind,
        df: &mut DataFrame,
    ) -> Result<PathBuf> {
        let path = output_path(&self.root, id, kind);
        if self.written.contains(&path) {
            return Err(OutputError::DuplicateOutput { path });
        }
        fs::create_dir_all(&self.root).map_err(|e| OutputError::Write {
            path: self.root.clone(),
            source: e,
        })?;
        write_csv(df, &path)?;
        info!(
            kind = %kind,
            path = %path.display(),
            columns = df.width(),
            "output written"
        );
        self.written.insert(path.clone());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut df = df!("name" => ["a b"], "count" => [3i64]).unwrap();
        write_csv(&mut df, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "name,count\na b,3\n");
    }

    #[test]
    fn refuses_second_write_to_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = OutputWriter::new(dir.path().join("output"));
        let id = AcquisitionId::new("T2_AXI").unwrap();
        let mut df = df!("a" => [1i64]).unwrap();

        let path = writer.write(&id, OutputKind::Qc, &mut df).unwrap();
        assert!(path.ends_with("T2_AXI_qc.csv"));
        assert!(path.is_file());

        let err = writer.write(&id, OutputKind::Qc, &mut df).unwrap_err();
        assert!(matches!(err, OutputError::DuplicateOutput { .. }));
        assert_eq!(writer.written().count(), 1);
    }

    #[test]
    fn overwrites_files_from_earlier_runs() {
        let dir = tempfile::tempdir().unwrap();
        let id = AcquisitionId::new("T2_AXI").unwrap();
        let stale = dir.path().join("T2_AXI_volume.csv");
        fs::write(&stale, "old\n").unwrap();

        let mut writer = OutputWriter::new(dir.path());
        let mut df = df!("a" => [1i64]).unwrap();
        writer.write(&id, OutputKind::Volume, &mut df).unwrap();
        assert_eq!(fs::read_to_string(&stale).unwrap(), "a\n1\n");
    }
}
