//! Deterministic output names: `{identifier}_{suffix}.csv`.

use std::path::{Path, PathBuf};

use scandemo_model::{AcquisitionId, OutputKind};

/// File name of an output table.
///
/// ```
/// use scandemo_model::{AcquisitionId, OutputKind};
/// use scandemo_output::output_file_name;
///
/// let id = AcquisitionId::new("sub-001_ses-001_T1w").unwrap();
/// assert_eq!(
///     output_file_name(&id, OutputKind::Thickness),
///     "sub-001_ses-001_T1w_thickness.csv"
/// );
/// ```
pub fn output_file_name(id: &AcquisitionId, kind: OutputKind) -> String {
    format!("{}_{}.csv", id, kind.suffix())
}

/// Full path of an output table under `root`.
pub fn output_path(root: &Path, id: &AcquisitionId, kind: OutputKind) -> PathBuf {
    root.join(output_file_name(id, kind))
}
