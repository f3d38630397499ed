//! Error types for metadata lookup and demographic resolution.

use std::path::PathBuf;

use scandemo_model::ModelError;
use thiserror::Error;

/// Container levels of the platform hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Analysis,
    Project,
    Subject,
    Session,
    Acquisition,
    File,
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Analysis => "analysis",
            Self::Project => "project",
            Self::Subject => "subject",
            Self::Session => "session",
            Self::Acquisition => "acquisition",
            Self::File => "file",
        };
        f.write_str(label)
    }
}

/// Failures reported by a [`MetadataClient`](crate::MetadataClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The requested container does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: ContainerKind, id: String },

    /// Failed to read a metadata snapshot.
    #[error("failed to read metadata snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata snapshot is not valid JSON or has an unexpected shape.
    #[error("invalid metadata snapshot: {0}")]
    SnapshotFormat(#[from] serde_json::Error),
}

/// Errors that can occur while resolving demographics.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Lookup(#[from] ClientError),

    /// Every rule of the age fallback chain came up empty.
    #[error("no age at scan for subject {subject}, session {session}")]
    MissingAge { subject: String, session: String },

    /// A header or session value could not be interpreted.
    #[error("malformed {field} value {value:?}: {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// More than one acquisition file qualifies and a single one is required.
    #[error("{} candidate files match, expected one: {}", candidates.len(), candidates.join(", "))]
    AmbiguousCandidates { candidates: Vec<String> },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
