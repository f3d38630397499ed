use std::path::PathBuf;

use scandemo_model::{DemographicRecord, OutputKind};
use scandemo_resolve::Resolution;

/// Outcome of a full run.
#[derive(Debug)]
pub struct RunSummary {
    pub record: DemographicRecord,
    pub resolution: Resolution,
    pub output_dir: PathBuf,
    pub outputs: Vec<OutputSummary>,
}

#[derive(Debug)]
pub struct OutputSummary {
    pub kind: OutputKind,
    /// `None` when the kind's optional tables were absent.
    pub path: Option<PathBuf>,
    pub columns: usize,
}
