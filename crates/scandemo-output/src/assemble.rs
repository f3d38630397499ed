//! Column-wise assembly of the demographic record with analysis tables.

use polars::prelude::*;
use scandemo_model::{DEMOGRAPHIC_COLUMNS, DemographicRecord};
use tracing::debug;

use crate::error::{OutputError, Result};

/// The demographic record as a one-row table.
pub fn record_frame(record: &DemographicRecord) -> Result<DataFrame> {
    let [subject, session, age, sex, acquisition] = DEMOGRAPHIC_COLUMNS;
    let columns = vec![
        Column::new(subject.into(), [record.subject_label.as_str()]),
        Column::new(session.into(), [record.session_label.as_str()]),
        Column::new(age.into(), [i64::from(record.age.value())]),
        Column::new(sex.into(), [record.sex.as_str()]),
        Column::new(acquisition.into(), [record.acquisition_id.as_str()]),
    ];
    Ok(DataFrame::new(columns)?)
}

/// Places the demographic columns before the columns of `table`.
pub fn assemble(record: &DemographicRecord, table: &DataFrame) -> Result<DataFrame> {
    assemble_all(record, &[table])
}

/// Places the demographic columns before the columns of every table, in order.
///
/// Each table must hold exactly one row. Columns named like a demographic
/// column are dropped from the tables. A column repeated across tables is kept
/// once if the values agree and rejected otherwise.
pub fn assemble_all(record: &DemographicRecord, tables: &[&DataFrame]) -> Result<DataFrame> {
    let mut out = record_frame(record)?;
    let expected = out.height();

    for (index, table) in tables.iter().enumerate() {
        if table.height() != expected {
            return Err(OutputError::RowCountMismatch {
                index,
                expected,
                found: table.height(),
            });
        }

        let mut appended: Vec<Column> = Vec::with_capacity(table.width());
        for column in table.get_columns() {
            let name = column.name().as_str();
            if DEMOGRAPHIC_COLUMNS.contains(&name) {
                debug!(column = name, table = index, "dropping redundant column");
                continue;
            }
            if let Ok(existing) = out.column(name) {
                if existing
                    .as_materialized_series()
                    .equals_missing(column.as_materialized_series())
                {
                    debug!(column = name, table = index, "dropping repeated column");
                    continue;
                }
                return Err(OutputError::DuplicateColumn {
                    name: name.to_string(),
                });
            }
            appended.push(column.clone());
        }
        out.hstack_mut(&appended)?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scandemo_model::{AcquisitionId, Age, AgeUnit, Sex};

    fn record() -> DemographicRecord {
        DemographicRecord {
            subject_label: "sub-001".to_string(),
            session_label: "ses-001".to_string(),
            age: Age::new(25, AgeUnit::Years).unwrap(),
            sex: Sex::Code("M".to_string()),
            acquisition_id: AcquisitionId::new("sub-001_ses-001_T1w").unwrap(),
        }
    }

    #[test]
    fn record_frame_has_one_row_in_column_order() {
        let df = record_frame(&record()).unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.get_column_names_str(), DEMOGRAPHIC_COLUMNS.to_vec());
        assert_eq!(
            df.column("age").unwrap().get(0).unwrap(),
            AnyValue::Int64(25)
        );
    }

    #[test]
    fn demographic_columns_lead() {
        let table = df!("b" => [2.0], "a" => [1.0]).unwrap();
        let out = assemble(&record(), &table).unwrap();
        assert_eq!(
            out.get_column_names_str(),
            vec!["subject", "session", "age", "sex", "acquisition", "b", "a"]
        );
    }

    #[test]
    fn two_rows_are_rejected() {
        let table = df!("a" => [1.0, 2.0]).unwrap();
        let err = assemble(&record(), &table).unwrap_err();
        assert!(matches!(
            err,
            OutputError::RowCountMismatch {
                index: 0,
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn empty_table_is_rejected() {
        let table = df!("a" => Vec::<f64>::new()).unwrap();
        assert!(matches!(
            assemble(&record(), &table),
            Err(OutputError::RowCountMismatch { found: 0, .. })
        ));
    }

    #[test]
    fn subject_column_is_dropped() {
        let table = df!("subject" => ["sub-001"], "TIV" => [1400000.0]).unwrap();
        let out = assemble(&record(), &table).unwrap();
        assert_eq!(out.width(), 6);
        assert_eq!(out.get_column_names_str()[5], "TIV");
        assert_eq!(
            out.column("subject").unwrap().get(0).unwrap(),
            AnyValue::String("sub-001")
        );
    }

    #[test]
    fn identical_repeated_columns_are_kept_once() {
        let lh = df!("lh.aparc.thickness" => ["sub-001"], "lh_cuneus" => [1.9], "eTIV" => [1.5e6])
            .unwrap();
        let rh = df!("rh.aparc.thickness" => ["sub-001"], "rh_cuneus" => [2.0], "eTIV" => [1.5e6])
            .unwrap();
        let out = assemble_all(&record(), &[&lh, &rh]).unwrap();
        assert_eq!(
            out.get_column_names_str()[5..].to_vec(),
            vec![
                "lh.aparc.thickness",
                "lh_cuneus",
                "eTIV",
                "rh.aparc.thickness",
                "rh_cuneus"
            ]
        );
    }

    #[test]
    fn conflicting_repeated_columns_are_rejected() {
        let lh = df!("eTIV" => [1.5e6]).unwrap();
        let rh = df!("eTIV" => [1.6e6]).unwrap();
        assert!(matches!(
            assemble_all(&record(), &[&lh, &rh]),
            Err(OutputError::DuplicateColumn { name }) if name == "eTIV"
        ));
    }

    #[test]
    fn mismatch_reports_table_index() {
        let ok = df!("a" => [1.0]).unwrap();
        let bad = df!("b" => [1.0, 2.0]).unwrap();
        assert!(matches!(
            assemble_all(&record(), &[&ok, &bad]),
            Err(OutputError::RowCountMismatch { index: 1, .. })
        ));
    }
}
