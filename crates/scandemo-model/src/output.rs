use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of assembled output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Cortical thickness, both hemispheres.
    Thickness,
    /// Segmentation volumes.
    Volume,
    /// Segmentation quality-control scores.
    Qc,
    /// Optional whole-brain volume export of the analysis script.
    SynthsegVolumes,
}

impl OutputKind {
    pub const ALL: [OutputKind; 4] = [
        OutputKind::Thickness,
        OutputKind::Volume,
        OutputKind::Qc,
        OutputKind::SynthsegVolumes,
    ];

    /// File-name suffix appended after the acquisition identifier.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Thickness => "thickness",
            Self::Volume => "volume",
            Self::Qc => "qc",
            Self::SynthsegVolumes => "synthseg_volumes",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
