//! Canonical acquisition identifiers.
//!
//! Every output file of a run is named after one identifier derived from the
//! raw input file name. Derivation:
//!
//! 1. keep the text after the final path separator (`/` or `\`)
//! 2. drop everything from the first `.` on
//! 3. trim surrounding whitespace
//! 4. replace each character outside `[A-Za-z0-9]` with `_`
//! 5. strip leading and trailing underscores

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Sanitize a raw file name into a filesystem-safe identifier.
///
/// The result may be empty (for example `"..."`); use
/// [`AcquisitionId::from_filename`] when an empty identifier must be rejected.
///
/// ```
/// use scandemo_model::sanitize;
///
/// assert_eq!(sanitize("MRI Brain.dcm"), "MRI_Brain");
/// assert_eq!(sanitize("T2 AXI__.dcm"), "T2_AXI");
/// assert_eq!(sanitize("..."), "");
/// ```
pub fn sanitize(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = base.split('.').next().unwrap_or_default();
    let replaced: String = stem
        .trim()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    replaced.trim_matches('_').to_string()
}

/// Identifier shared by the demographic record and every output file name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcquisitionId(String);

impl AcquisitionId {
    /// Derive the identifier from a raw input file name.
    pub fn from_filename(filename: &str) -> Result<Self, ModelError> {
        let cleaned = sanitize(filename);
        if cleaned.is_empty() {
            return Err(ModelError::EmptyIdentifier {
                filename: filename.to_string(),
            });
        }
        Ok(Self(cleaned))
    }

    /// Accept an identifier that is already canonical.
    ///
    /// Besides the characters produced by [`sanitize`], hyphens are allowed so
    /// that BIDS-style labels (`sub-001_ses-001_T1w`) can be passed through.
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let valid_chars = value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        let bad_edge = |ch: char| ch == '_' || ch == '-';
        if value.is_empty()
            || !valid_chars
            || value.starts_with(bad_edge)
            || value.ends_with(bad_edge)
        {
            return Err(ModelError::InvalidIdentifier(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AcquisitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AcquisitionId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AcquisitionId> for String {
    fn from(value: AcquisitionId) -> Self {
        value.0
    }
}
