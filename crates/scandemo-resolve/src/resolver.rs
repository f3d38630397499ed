//! Age and sex resolution.
//!
//! Age is taken from the first rule whose source is present:
//!
//! 1. `SeriesDate - PatientBirthDate` in calendar days
//! 2. session age (seconds) truncated to whole years
//! 3. `PatientAge` header string, unit validated
//!
//! The resolved value is sign-normalized. Zero, whether produced by a rule or
//! because no rule applied, means the age is unresolved and the run fails.

use scandemo_model::{AcquisitionId, Age, AgeSource, AgeUnit, DemographicRecord, Sex};
use tracing::{debug, info, info_span, warn};

use crate::age_string::parse_age_string;
use crate::candidates::{
    AcquisitionFilter, Candidate, CandidatePolicy, choose_candidate, find_candidates,
};
use crate::client::{
    HeaderInfo, MetadataClient, PATIENT_AGE, PATIENT_BIRTH_DATE, PATIENT_SEX, SERIES_DATE,
    Session,
};
use crate::dates::{age_in_days, parse_header_date};
use crate::error::{ResolveError, Result};

/// Seconds in a 365-day year.
pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Output of a single fallback rule, before sign normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAge {
    pub value: i64,
    pub unit: AgeUnit,
    pub source: AgeSource,
}

/// Resolved demographics of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub age: Age,
    pub age_source: AgeSource,
    pub sex: Sex,
    /// `acquisition label/file name` of the file that drove resolution.
    pub candidate: Option<String>,
}

/// Runs the fallback chain; `Ok(None)` when no rule has a source.
pub fn apply_age_rules(header: &HeaderInfo, session_age: Option<f64>) -> Result<Option<RawAge>> {
    if let (Some(birth), Some(series)) = (
        header.text(PATIENT_BIRTH_DATE),
        header.text(SERIES_DATE),
    ) {
        let birth_date = parse_date_field(PATIENT_BIRTH_DATE, &birth)?;
        let series_date = parse_date_field(SERIES_DATE, &series)?;
        return Ok(Some(RawAge {
            value: age_in_days(birth_date, series_date),
            unit: AgeUnit::Days,
            source: AgeSource::BirthAndSeriesDate,
        }));
    }

    if let Some(seconds) = session_age {
        if !seconds.is_finite() {
            return Err(ResolveError::Parse {
                field: "session age",
                value: seconds.to_string(),
                reason: "not a finite number".to_string(),
            });
        }
        return Ok(Some(RawAge {
            value: (seconds / SECONDS_PER_YEAR).trunc() as i64,
            unit: AgeUnit::Years,
            source: AgeSource::SessionAge,
        }));
    }

    if let Some(text) = header.text(PATIENT_AGE) {
        let (value, unit) = parse_age_string(&text).map_err(|e| ResolveError::Parse {
            field: PATIENT_AGE,
            value: text.clone(),
            reason: e.to_string(),
        })?;
        return Ok(Some(RawAge {
            value: i64::from(value),
            unit,
            source: AgeSource::PatientAge,
        }));
    }

    Ok(None)
}

fn parse_date_field(field: &'static str, value: &str) -> Result<chrono::NaiveDate> {
    parse_header_date(value).ok_or_else(|| ResolveError::Parse {
        field,
        value: value.to_string(),
        reason: "expected a YYYYMMDD date".to_string(),
    })
}

/// Sign-normalizes a raw age; `None` when the magnitude is zero.
pub fn finalize_age(raw: RawAge) -> Option<Age> {
    let magnitude = u32::try_from(raw.value.unsigned_abs()).ok()?;
    Age::new(magnitude, raw.unit).ok()
}

/// Reads the sex code; absent or unreadable values become `NA`.
pub fn resolve_sex(header: &HeaderInfo) -> Sex {
    let sex = Sex::from_header(header.text(PATIENT_SEX).as_deref());
    if !sex.is_available() {
        warn!(tag = PATIENT_SEX, "sex missing from header, using NA");
    }
    sex
}

/// Resolves age and sex for a session.
pub struct AgeResolver<'a, C: MetadataClient + ?Sized> {
    client: &'a C,
    filter: AcquisitionFilter,
    policy: CandidatePolicy,
}

impl<'a, C: MetadataClient + ?Sized> AgeResolver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            filter: AcquisitionFilter::default(),
            policy: CandidatePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: AcquisitionFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CandidatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolves demographics from the session's matching image headers.
    ///
    /// `subject_label` is used for error reporting only.
    pub fn resolve(&self, subject_label: &str, session: &Session) -> Result<Resolution> {
        let candidates = find_candidates(self.client, &session.id, &self.filter)?;
        let chosen = choose_candidate(candidates, self.policy)?;
        let empty = HeaderInfo::default();
        let header = match &chosen {
            Some(candidate) => &candidate.header,
            None => {
                warn!(
                    session = %session.label,
                    "no matching acquisition file, only the session age can be used"
                );
                &empty
            }
        };

        let sex = resolve_sex(header);
        let missing = || ResolveError::MissingAge {
            subject: subject_label.to_string(),
            session: session.label.clone(),
        };
        let raw = apply_age_rules(header, session.age)?.ok_or_else(missing)?;
        let Some(age) = finalize_age(raw) else {
            warn!(source = %raw.source, "age rule produced zero");
            return Err(missing());
        };
        if raw.value < 0 {
            debug!(source = %raw.source, "negative age normalized");
        }
        debug!(source = %raw.source, unit = %age.unit(), "age resolved");

        Ok(Resolution {
            age,
            age_source: raw.source,
            sex,
            candidate: chosen.as_ref().map(Candidate::describe),
        })
    }
}

/// Looks up the destination analysis's containers and builds the record.
pub fn gather_demographics<C>(
    resolver: &AgeResolver<'_, C>,
    destination_id: &str,
    acquisition_id: AcquisitionId,
) -> Result<(DemographicRecord, Resolution)>
where
    C: MetadataClient + ?Sized,
{
    let client = resolver.client;
    let analysis = client.analysis(destination_id)?;
    let project = client.project(&analysis.parents.project)?;
    let subject = client.subject(&analysis.parents.subject)?;
    let session = client.session(&analysis.parents.session)?;

    let span = info_span!(
        "resolve",
        project = %project.label,
        subject = %subject.label,
        session = %session.label
    );
    let _guard = span.enter();

    let resolution = resolver.resolve(&subject.label, &session)?;
    info!(
        age_source = %resolution.age_source,
        sex_available = resolution.sex.is_available(),
        "demographics resolved"
    );

    let record = DemographicRecord {
        subject_label: subject.label,
        session_label: session.label,
        age: resolution.age,
        sex: resolution.sex.clone(),
        acquisition_id,
    };
    Ok((record, resolution))
}
