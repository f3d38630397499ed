//! Selection of the image file whose header drives age resolution.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::{HeaderInfo, MetadataClient, SERIES_DATE};
use crate::dates::parse_header_date;
use crate::error::{ResolveError, Result};

/// Acquisition label filter.
///
/// A label matches when it contains every `include` marker and none of the
/// `exclude` markers. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionFilter {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for AcquisitionFilter {
    /// Axial T2-weighted acquisitions that are not segmentation or alignment
    /// derivatives.
    fn default() -> Self {
        Self {
            include: vec!["T2".to_string(), "AXI".to_string()],
            exclude: vec!["Segmentation".to_string(), "Align".to_string()],
        }
    }
}

impl AcquisitionFilter {
    pub fn matches(&self, label: &str) -> bool {
        self.include.iter().all(|marker| label.contains(marker.as_str()))
            && !self.exclude.iter().any(|marker| label.contains(marker.as_str()))
    }
}

/// How to pick one file when several qualify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidatePolicy {
    /// Earliest `SeriesDate` first (undated last), then acquisition label,
    /// then file name.
    #[default]
    EarliestSeries,
    /// Fail unless exactly zero or one file qualifies.
    RequireSingle,
}

/// A DICOM file of a matching acquisition, with its header.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub acquisition_id: String,
    pub acquisition_label: String,
    pub file_name: String,
    pub header: HeaderInfo,
}

impl Candidate {
    pub fn series_date(&self) -> Option<NaiveDate> {
        self.header
            .text(SERIES_DATE)
            .and_then(|value| parse_header_date(&value))
    }

    /// `acquisition label/file name`, for logs and error messages.
    pub fn describe(&self) -> String {
        format!("{}/{}", self.acquisition_label, self.file_name)
    }
}

/// Collects the DICOM files of every acquisition matching `filter`.
pub fn find_candidates<C>(
    client: &C,
    session_id: &str,
    filter: &AcquisitionFilter,
) -> Result<Vec<Candidate>>
where
    C: MetadataClient + ?Sized,
{
    let mut candidates = Vec::new();
    for acquisition in client.acquisitions(session_id)? {
        if !filter.matches(&acquisition.label) {
            continue;
        }
        for file in acquisition.files.iter().filter(|file| file.is_dicom()) {
            let header = client.file_info(&acquisition.id, &file.name)?;
            debug!(
                acquisition = %acquisition.label,
                file = %file.name,
                "found candidate file"
            );
            candidates.push(Candidate {
                acquisition_id: acquisition.id.clone(),
                acquisition_label: acquisition.label.clone(),
                file_name: file.name.clone(),
                header,
            });
        }
    }
    Ok(candidates)
}

fn compare_series_dates(left: Option<NaiveDate>, right: Option<NaiveDate>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Picks the candidate that drives resolution, or `None` when there is none.
pub fn choose_candidate(
    mut candidates: Vec<Candidate>,
    policy: CandidatePolicy,
) -> Result<Option<Candidate>> {
    if candidates.len() > 1 {
        match policy {
            CandidatePolicy::RequireSingle => {
                return Err(ResolveError::AmbiguousCandidates {
                    candidates: candidates.iter().map(Candidate::describe).collect(),
                });
            }
            CandidatePolicy::EarliestSeries => {
                candidates.sort_by(|a, b| {
                    compare_series_dates(a.series_date(), b.series_date())
                        .then_with(|| a.acquisition_label.cmp(&b.acquisition_label))
                        .then_with(|| a.file_name.cmp(&b.file_name))
                });
                warn!(
                    count = candidates.len(),
                    chosen = %candidates[0].describe(),
                    "multiple candidate files, using the earliest series"
                );
            }
        }
    }
    Ok(candidates.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(label: &str, file: &str, series_date: Option<&str>) -> Candidate {
        let header: HeaderInfo = series_date
            .map(|date| (SERIES_DATE.to_string(), json!(date)))
            .into_iter()
            .collect();
        Candidate {
            acquisition_id: format!("id-{label}"),
            acquisition_label: label.to_string(),
            file_name: file.to_string(),
            header,
        }
    }

    #[test]
    fn default_filter_selects_axial_t2() {
        let filter = AcquisitionFilter::default();
        assert!(filter.matches("T2 AXI"));
        assert!(filter.matches("Ax T2 FSE (AXI)"));
        assert!(!filter.matches("T2 SAG"));
        assert!(!filter.matches("T1 AXI"));
        assert!(!filter.matches("T2 AXI Segmentation"));
        assert!(!filter.matches("T2 AXI Align"));
        assert!(!filter.matches("t2 axi"));
    }

    #[test]
    fn no_candidates_yields_none() {
        assert_eq!(
            choose_candidate(Vec::new(), CandidatePolicy::RequireSingle).unwrap(),
            None
        );
    }

    #[test]
    fn single_candidate_is_used_under_any_policy() {
        let only = candidate("T2 AXI", "a.dcm", None);
        let chosen = choose_candidate(vec![only.clone()], CandidatePolicy::RequireSingle).unwrap();
        assert_eq!(chosen, Some(only));
    }

    #[test]
    fn earliest_series_wins() {
        let chosen = choose_candidate(
            vec![
                candidate("T2 AXI", "late.dcm", Some("20240301")),
                candidate("T2 AXI repeat", "undated.dcm", None),
                candidate("T2 AXI", "early.dcm", Some("20240101")),
            ],
            CandidatePolicy::EarliestSeries,
        )
        .unwrap()
        .unwrap();
        assert_eq!(chosen.file_name, "early.dcm");
    }

    #[test]
    fn ties_break_on_label_then_file() {
        let chosen = choose_candidate(
            vec![
                candidate("T2 AXI b", "z.dcm", Some("20240101")),
                candidate("T2 AXI a", "y.dcm", Some("20240101")),
                candidate("T2 AXI a", "x.dcm", Some("20240101")),
            ],
            CandidatePolicy::EarliestSeries,
        )
        .unwrap()
        .unwrap();
        assert_eq!(chosen.describe(), "T2 AXI a/x.dcm");
    }

    #[test]
    fn require_single_rejects_multiple() {
        let err = choose_candidate(
            vec![
                candidate("T2 AXI", "a.dcm", None),
                candidate("T2 AXI", "b.dcm", None),
            ],
            CandidatePolicy::RequireSingle,
        )
        .unwrap_err();
        match err {
            ResolveError::AmbiguousCandidates { candidates } => {
                assert_eq!(candidates, vec!["T2 AXI/a.dcm", "T2 AXI/b.dcm"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
