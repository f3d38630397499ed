//! Demographic resolution over the imaging platform's metadata tree.
//!
//! The platform itself is reached through [`MetadataClient`]; this crate ships
//! [`SnapshotClient`], which serves a JSON export of the container tree.

pub mod age_string;
pub mod candidates;
pub mod client;
pub mod dates;
pub mod error;
pub mod resolver;
pub mod snapshot;

pub use candidates::{AcquisitionFilter, Candidate, CandidatePolicy};
pub use client::{
    Acquisition, Analysis, FileEntry, HeaderInfo, MetadataClient, Parents, Project, Session,
    Subject,
};
pub use error::{ClientError, ContainerKind, ResolveError, Result};
pub use resolver::{AgeResolver, Resolution, gather_demographics};
pub use snapshot::SnapshotClient;
