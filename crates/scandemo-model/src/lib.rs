//! Data model for subject demographics and assembled output tables.

pub mod error;
pub mod ids;
pub mod output;
pub mod record;

pub use error::{ModelError, Result};
pub use ids::{AcquisitionId, sanitize};
pub use output::OutputKind;
pub use record::{Age, AgeSource, AgeUnit, DEMOGRAPHIC_COLUMNS, DemographicRecord, Sex};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes() {
        let record = DemographicRecord {
            subject_label: "sub-001".to_string(),
            session_label: "ses-001".to_string(),
            age: Age::new(25, AgeUnit::Years).expect("age"),
            sex: Sex::from_header(Some("M")),
            acquisition_id: AcquisitionId::new("sub-001_ses-001_T1w").expect("id"),
        };
        let json = serde_json::to_string(&record).expect("serialize record");
        let round: DemographicRecord = serde_json::from_str(&json).expect("deserialize record");
        assert_eq!(round, record);
    }
}
