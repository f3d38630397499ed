//! Read-only view of the imaging platform's container hierarchy.
//!
//! A project contains subjects, a subject contains sessions, a session
//! contains acquisitions and an acquisition contains files. The analysis a
//! run writes into points back at its project, subject and session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientResult;

/// Header tag holding the patient sex code.
pub const PATIENT_SEX: &str = "PatientSex";
/// Header tag holding the birth date (DICOM `DA`).
pub const PATIENT_BIRTH_DATE: &str = "PatientBirthDate";
/// Header tag holding the series acquisition date (DICOM `DA`).
pub const SERIES_DATE: &str = "SeriesDate";
/// Header tag holding the free-text age (DICOM `AS`).
pub const PATIENT_AGE: &str = "PatientAge";

/// Parent containers of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parents {
    pub project: String,
    pub subject: String,
    pub session: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: String,
    pub parents: Parents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub label: String,
    /// Age at scan in seconds, when the platform recorded one.
    #[serde(default)]
    pub age: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub file_type: Option<String>,
}

impl FileEntry {
    pub fn is_dicom(&self) -> bool {
        self.file_type.as_deref() == Some("dicom")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acquisition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Header fields extracted from an image file, keyed by DICOM tag name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderInfo(BTreeMap<String, Value>);

impl HeaderInfo {
    pub fn new(fields: BTreeMap<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, tag: &str) -> Option<&Value> {
        self.0.get(tag)
    }

    /// Returns the tag as trimmed text; null and blank values count as absent.
    ///
    /// Numbers are rendered as text, since some exports store `DA` values as
    /// integers.
    pub fn text(&self, tag: &str) -> Option<String> {
        let text = match self.0.get(tag)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.text(tag).is_some()
    }
}

impl FromIterator<(String, Value)> for HeaderInfo {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Hierarchical metadata lookup by identifier.
///
/// Implementations are blocking; every call is made at most once per run.
pub trait MetadataClient {
    fn analysis(&self, id: &str) -> ClientResult<Analysis>;

    fn project(&self, id: &str) -> ClientResult<Project>;

    fn subject(&self, id: &str) -> ClientResult<Subject>;

    fn session(&self, id: &str) -> ClientResult<Session>;

    /// Acquisitions of a session, in platform order.
    fn acquisitions(&self, session_id: &str) -> ClientResult<Vec<Acquisition>>;

    /// Header info of one file of an acquisition.
    fn file_info(&self, acquisition_id: &str, file_name: &str) -> ClientResult<HeaderInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_text_normalizes_values() {
        let header: HeaderInfo = [
            ("PatientSex".to_string(), json!(" F ")),
            ("SeriesDate".to_string(), json!(20240101)),
            ("PatientAge".to_string(), json!("")),
            ("PatientBirthDate".to_string(), Value::Null),
        ]
        .into_iter()
        .collect();

        assert_eq!(header.text(PATIENT_SEX).as_deref(), Some("F"));
        assert_eq!(header.text(SERIES_DATE).as_deref(), Some("20240101"));
        assert_eq!(header.text(PATIENT_AGE), None);
        assert!(!header.contains(PATIENT_BIRTH_DATE));
        assert!(header.get(PATIENT_BIRTH_DATE).is_some());
    }

    #[test]
    fn file_type_detects_dicom() {
        let dicom: FileEntry =
            serde_json::from_value(json!({"name": "t2.dcm.zip", "type": "dicom"})).unwrap();
        let nifti: FileEntry =
            serde_json::from_value(json!({"name": "t2.nii.gz", "type": "nifti"})).unwrap();
        let untyped: FileEntry = serde_json::from_value(json!({"name": "notes.txt"})).unwrap();
        assert!(dicom.is_dicom());
        assert!(!nifti.is_dicom());
        assert!(!untyped.is_dicom());
    }
}
