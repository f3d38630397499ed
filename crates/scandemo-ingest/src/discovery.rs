//! Input file discovery.
//!
//! The input directory normally holds a single image archive. When it holds
//! more, the lexicographically first file name is used so that the choice
//! never depends on directory-listing order.

use std::path::{Path, PathBuf};

use scandemo_model::AcquisitionId;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Lists the regular files of a directory (non-recursive).
///
/// Returns files sorted by file name.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Picks the file the acquisition identifier is derived from.
pub fn select_source_file(dir: &Path) -> Result<PathBuf> {
    let files = list_input_files(dir)?;
    let mut iter = files.into_iter();
    let Some(first) = iter.next() else {
        return Err(IngestError::NoInputFile {
            path: dir.to_path_buf(),
        });
    };
    let ignored = iter.count();
    if ignored > 0 {
        warn!(
            dir = %dir.display(),
            chosen = %first.display(),
            ignored,
            "multiple input files found, using the first by name"
        );
    }
    Ok(first)
}

/// Derives the canonical acquisition identifier from the input directory.
pub fn source_identifier(dir: &Path) -> Result<AcquisitionId> {
    let source = select_source_file(dir)?;
    let filename = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let id = AcquisitionId::from_filename(&filename)?;
    debug!(source = %filename, acquisition_id = %id, "derived acquisition identifier");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_input_files(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn empty_directory_has_no_source() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            select_source_file(dir.path()),
            Err(IngestError::NoInputFile { .. })
        ));
    }

    #[test]
    fn picks_first_file_by_name_and_skips_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b_scan.dcm.zip");
        touch(dir.path(), "a_scan.dcm.zip");
        fs::create_dir(dir.path().join("0_subdir")).unwrap();

        let chosen = select_source_file(dir.path()).unwrap();
        assert_eq!(chosen.file_name().unwrap(), "a_scan.dcm.zip");
    }

    #[test]
    fn identifier_comes_from_source_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "T2 AXI__.dcm.zip");
        let id = source_identifier(dir.path()).unwrap();
        assert_eq!(id.as_str(), "T2_AXI");
    }

    #[test]
    fn unusable_file_name_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "...");
        assert!(matches!(
            source_identifier(dir.path()),
            Err(IngestError::Model(_))
        ));
    }
}
