//! [`MetadataClient`] backed by a JSON export of the container tree.
//!
//! ```json
//! {
//!   "analyses": [{"id": "an1", "parents": {"project": "p1", "subject": "su1", "session": "se1"}}],
//!   "projects": [{"id": "p1", "label": "Infant MRI"}],
//!   "subjects": [{"id": "su1", "label": "sub-001"}],
//!   "sessions": [{
//!     "id": "se1", "label": "ses-001", "age": 631152000,
//!     "acquisitions": [{
//!       "id": "ac1", "label": "T2 AXI",
//!       "files": [{"name": "t2.dcm.zip", "type": "dicom", "info": {"PatientSex": "M"}}]
//!     }]
//!   }]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::client::{
    Acquisition, Analysis, FileEntry, HeaderInfo, MetadataClient, Project, Session, Subject,
};
use crate::error::{ClientError, ClientResult, ContainerKind};

#[derive(Debug, Default, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    analyses: Vec<Analysis>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    subjects: Vec<Subject>,
    #[serde(default)]
    sessions: Vec<SnapshotSession>,
}

#[derive(Debug, Deserialize)]
struct SnapshotSession {
    id: String,
    label: String,
    #[serde(default)]
    age: Option<f64>,
    #[serde(default)]
    acquisitions: Vec<SnapshotAcquisition>,
}

#[derive(Debug, Deserialize)]
struct SnapshotAcquisition {
    id: String,
    label: String,
    #[serde(default)]
    files: Vec<SnapshotFile>,
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    name: String,
    #[serde(rename = "type", default)]
    file_type: Option<String>,
    #[serde(default)]
    info: HeaderInfo,
}

/// In-memory metadata tree.
#[derive(Debug, Default)]
pub struct SnapshotClient {
    analyses: BTreeMap<String, Analysis>,
    projects: BTreeMap<String, Project>,
    subjects: BTreeMap<String, Subject>,
    sessions: BTreeMap<String, Session>,
    session_acquisitions: BTreeMap<String, Vec<Acquisition>>,
    file_info: BTreeMap<(String, String), HeaderInfo>,
}

impl SnapshotClient {
    pub fn from_json_str(json: &str) -> ClientResult<Self> {
        let document: SnapshotDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(document))
    }

    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ClientError::SnapshotRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let client = Self::from_json_str(&json)?;
        debug!(
            path = %path.display(),
            sessions = client.sessions.len(),
            "loaded metadata snapshot"
        );
        Ok(client)
    }

    fn from_document(document: SnapshotDocument) -> Self {
        let mut client = Self {
            analyses: by_id(document.analyses, |a| &a.id),
            projects: by_id(document.projects, |p| &p.id),
            subjects: by_id(document.subjects, |s| &s.id),
            ..Self::default()
        };
        for session in document.sessions {
            let mut acquisitions = Vec::with_capacity(session.acquisitions.len());
            for acquisition in session.acquisitions {
                let mut files = Vec::with_capacity(acquisition.files.len());
                for file in acquisition.files {
                    client
                        .file_info
                        .insert((acquisition.id.clone(), file.name.clone()), file.info);
                    files.push(FileEntry {
                        name: file.name,
                        file_type: file.file_type,
                    });
                }
                acquisitions.push(Acquisition {
                    id: acquisition.id,
                    label: acquisition.label,
                    files,
                });
            }
            client
                .session_acquisitions
                .insert(session.id.clone(), acquisitions);
            client.sessions.insert(
                session.id.clone(),
                Session {
                    id: session.id,
                    label: session.label,
                    age: session.age,
                },
            );
        }
        client
    }
}

fn by_id<T>(items: Vec<T>, id: impl Fn(&T) -> &String) -> BTreeMap<String, T> {
    items
        .into_iter()
        .map(|item| (id(&item).clone(), item))
        .collect()
}

fn not_found(kind: ContainerKind, id: &str) -> ClientError {
    ClientError::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl MetadataClient for SnapshotClient {
    fn analysis(&self, id: &str) -> ClientResult<Analysis> {
        self.analyses
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(ContainerKind::Analysis, id))
    }

    fn project(&self, id: &str) -> ClientResult<Project> {
        self.projects
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(ContainerKind::Project, id))
    }

    fn subject(&self, id: &str) -> ClientResult<Subject> {
        self.subjects
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(ContainerKind::Subject, id))
    }

    fn session(&self, id: &str) -> ClientResult<Session> {
        self.sessions
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(ContainerKind::Session, id))
    }

    fn acquisitions(&self, session_id: &str) -> ClientResult<Vec<Acquisition>> {
        self.session_acquisitions
            .get(session_id)
            .cloned()
            .ok_or_else(|| not_found(ContainerKind::Session, session_id))
    }

    fn file_info(&self, acquisition_id: &str, file_name: &str) -> ClientResult<HeaderInfo> {
        self.file_info
            .get(&(acquisition_id.to_string(), file_name.to_string()))
            .cloned()
            .ok_or_else(|| not_found(ContainerKind::File, &format!("{acquisition_id}/{file_name}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::PATIENT_SEX;

    const SNAPSHOT: &str = r#"{
        "analyses": [{"id": "an1", "parents": {"project": "p1", "subject": "su1", "session": "se1"}}],
        "projects": [{"id": "p1", "label": "Infant MRI"}],
        "subjects": [{"id": "su1", "label": "sub-001"}],
        "sessions": [{
            "id": "se1", "label": "ses-001", "age": 631152000,
            "acquisitions": [{
                "id": "ac1", "label": "T2 AXI",
                "files": [
                    {"name": "t2.dcm.zip", "type": "dicom", "info": {"PatientSex": "M"}},
                    {"name": "t2.nii.gz", "type": "nifti"}
                ]
            }]
        }]
    }"#;

    #[test]
    fn resolves_hierarchy() {
        let client = SnapshotClient::from_json_str(SNAPSHOT).unwrap();
        let analysis = client.analysis("an1").unwrap();
        assert_eq!(analysis.parents.session, "se1");
        assert_eq!(client.project("p1").unwrap().label, "Infant MRI");
        assert_eq!(client.subject("su1").unwrap().label, "sub-001");

        let session = client.session("se1").unwrap();
        assert_eq!(session.label, "ses-001");
        assert_eq!(session.age, Some(631_152_000.0));

        let acquisitions = client.acquisitions("se1").unwrap();
        assert_eq!(acquisitions.len(), 1);
        assert_eq!(acquisitions[0].files.len(), 2);
        assert!(acquisitions[0].files[0].is_dicom());

        let info = client.file_info("ac1", "t2.dcm.zip").unwrap();
        assert_eq!(info.text(PATIENT_SEX).as_deref(), Some("M"));
        assert_eq!(client.file_info("ac1", "t2.nii.gz").unwrap(), HeaderInfo::default());
    }

    #[test]
    fn unknown_ids_are_lookup_errors() {
        let client = SnapshotClient::from_json_str(SNAPSHOT).unwrap();
        assert!(matches!(
            client.subject("missing"),
            Err(ClientError::NotFound {
                kind: ContainerKind::Subject,
                ..
            })
        ));
        assert!(matches!(
            client.file_info("ac1", "other.dcm"),
            Err(ClientError::NotFound {
                kind: ContainerKind::File,
                ..
            })
        ));
    }

    #[test]
    fn malformed_snapshot_is_rejected() {
        assert!(matches!(
            SnapshotClient::from_json_str("{\"sessions\": 3}"),
            Err(ClientError::SnapshotFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SnapshotClient::from_path(&dir.path().join("metadata.json")),
            Err(ClientError::SnapshotRead { .. })
        ));
    }
}
