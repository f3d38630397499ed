//! Assembly and writing of the per-kind output files.

use std::fs;

use polars::prelude::*;
use scandemo_model::{AcquisitionId, Age, AgeUnit, DemographicRecord, OutputKind, Sex};
use scandemo_output::{OutputWriter, assemble, assemble_all};

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
fn thickness_output_for_one_subject() {
    let dir = tempfile::tempdir().unwrap();
    let lh = df!(
        "lh.aparc.thickness" => ["sub-001"],
        "lh_bankssts_thickness" => [2512i64],
        "lh_MeanThickness_thickness" => [2431i64]
    )
    .unwrap();
    let rh = df!(
        "rh.aparc.thickness" => ["sub-001"],
        "rh_bankssts_thickness" => [2498i64],
        "rh_MeanThickness_thickness" => [2402i64]
    )
    .unwrap();

    let record = record();
    let mut out = assemble_all(&record, &[&lh, &rh]).unwrap();
    let mut writer = OutputWriter::new(dir.path());
    let path = writer
        .write(&record.acquisition_id, OutputKind::Thickness, &mut out)
        .unwrap();

    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("sub-001_ses-001_T1w_thickness.csv")
    );
    insta::assert_snapshot!(fs::read_to_string(&path).unwrap(), @r"
    subject,session,age,sex,acquisition,lh.aparc.thickness,lh_bankssts_thickness,lh_MeanThickness_thickness,rh.aparc.thickness,rh_bankssts_thickness,rh_MeanThickness_thickness
    sub-001,ses-001,25,M,sub-001_ses-001_T1w,sub-001,2512,2431,sub-001,2498,2402
    ");
}

#[test]
fn each_kind_lands_in_its_own_file() {
    let dir = tempfile::tempdir().unwrap();
    let record = record();
    let mut writer = OutputWriter::new(dir.path());

    for kind in OutputKind::ALL {
        let table = df!("Total intracranial" => [1_450_000i64]).unwrap();
        let mut out = assemble(&record, &table).unwrap();
        writer.write(&record.acquisition_id, kind, &mut out).unwrap();
    }

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "sub-001_ses-001_T1w_qc.csv",
            "sub-001_ses-001_T1w_synthseg_volumes.csv",
            "sub-001_ses-001_T1w_thickness.csv",
            "sub-001_ses-001_T1w_volume.csv"
        ]
    );
}

#[test]
fn missing_sex_is_written_as_na() {
    let dir = tempfile::tempdir().unwrap();
    let record = DemographicRecord {
        sex: Sex::NotAvailable,
        ..record()
    };
    let table = df!("general white matter" => [0i64]).unwrap();
    let mut out = assemble(&record, &table).unwrap();
    let path = OutputWriter::new(dir.path())
        .write(&record.acquisition_id, OutputKind::Qc, &mut out)
        .unwrap();
    insta::assert_snapshot!(fs::read_to_string(&path).unwrap(), @r"
    subject,session,age,sex,acquisition,general white matter
    sub-001,ses-001,25,NA,sub-001_ses-001_T1w,0
    ");
}
