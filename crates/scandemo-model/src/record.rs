//! The per-run demographic record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AcquisitionId, ModelError};

/// Column names of the demographic record, in output order.
pub const DEMOGRAPHIC_COLUMNS: [&str; 5] = ["subject", "session", "age", "sex", "acquisition"];

/// Sentinel written when the sex of a subject is unknown.
pub const SEX_NOT_AVAILABLE: &str = "NA";

/// Unit of an age value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl AgeUnit {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

impl fmt::Display for AgeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses the DICOM age-string suffix (`D`, `W`, `M`, `Y`), either case.
impl FromStr for AgeUnit {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "D" | "d" => Ok(Self::Days),
            "W" | "w" => Ok(Self::Weeks),
            "M" | "m" => Ok(Self::Months),
            "Y" | "y" => Ok(Self::Years),
            other => Err(ModelError::UnknownAgeUnit(other.to_string())),
        }
    }
}

/// A positive age at scan.
///
/// Zero is never a valid age: it is how an unresolved age is represented
/// upstream, so construction rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AgeFields")]
pub struct Age {
    value: u32,
    unit: AgeUnit,
}

#[derive(Deserialize)]
struct AgeFields {
    value: u32,
    unit: AgeUnit,
}

impl TryFrom<AgeFields> for Age {
    type Error = ModelError;

    fn try_from(fields: AgeFields) -> Result<Self, Self::Error> {
        Self::new(fields.value, fields.unit)
    }
}

impl Age {
    pub fn new(value: u32, unit: AgeUnit) -> Result<Self, ModelError> {
        if value == 0 {
            return Err(ModelError::ZeroAge);
        }
        Ok(Self { value, unit })
    }

    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub const fn unit(&self) -> AgeUnit {
        self.unit
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Which rule of the fallback chain produced the age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeSource {
    /// Calendar-day difference between `SeriesDate` and `PatientBirthDate`.
    BirthAndSeriesDate,
    /// Numeric age (seconds) stored on the session container.
    SessionAge,
    /// Free-text `PatientAge` header value.
    PatientAge,
}

impl AgeSource {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BirthAndSeriesDate => "birth/series date",
            Self::SessionAge => "session age",
            Self::PatientAge => "patient age",
        }
    }
}

impl fmt::Display for AgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Biological sex as recorded in the image header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Code(String),
    NotAvailable,
}

impl Sex {
    /// Build from an optional header value; blank values count as missing.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(code) if !code.is_empty() => Self::Code(code.to_string()),
            _ => Self::NotAvailable,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Code(code) => code,
            Self::NotAvailable => SEX_NOT_AVAILABLE,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Code(_))
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demographics of one subject/session, one instance per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicRecord {
    pub subject_label: String,
    pub session_label: String,
    pub age: Age,
    pub sex: Sex,
    pub acquisition_id: AcquisitionId,
}
