//! One run, end to end: identifier, demographics, analysis, outputs.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use scandemo_ingest::{TableFormat, read_table, source_identifier};
use scandemo_model::{AcquisitionId, DemographicRecord, OutputKind};
use scandemo_output::{OutputWriter, assemble_all};
use scandemo_resolve::{AgeResolver, MetadataClient, Resolution, gather_demographics};

use crate::config::RunConfig;
use crate::logging::redact_value;
use crate::runner::run_analysis;
use crate::types::{OutputSummary, RunSummary};

/// A table the analysis script leaves in the work directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSource {
    pub file_name: &'static str,
    pub format: TableFormat,
    /// Optional tables may be absent; the output is then skipped.
    pub required: bool,
}

const THICKNESS_TABLES: [TableSource; 2] = [
    TableSource {
        file_name: "aparc_lh.csv",
        format: TableFormat::Tsv,
        required: true,
    },
    TableSource {
        file_name: "aparc_rh.csv",
        format: TableFormat::Tsv,
        required: true,
    },
];

const VOLUME_TABLES: [TableSource; 1] = [TableSource {
    file_name: "synthseg.vol.csv",
    format: TableFormat::Csv,
    required: true,
}];

const QC_TABLES: [TableSource; 1] = [TableSource {
    file_name: "synthseg.qc.csv",
    format: TableFormat::Csv,
    required: true,
}];

const SYNTHSEG_VOLUME_TABLES: [TableSource; 1] = [TableSource {
    file_name: "vol.csv",
    format: TableFormat::Csv,
    required: false,
}];

/// Tables combined into each output, in column order.
pub fn table_sources(kind: OutputKind) -> &'static [TableSource] {
    match kind {
        OutputKind::Thickness => &THICKNESS_TABLES,
        OutputKind::Volume => &VOLUME_TABLES,
        OutputKind::Qc => &QC_TABLES,
        OutputKind::SynthsegVolumes => &SYNTHSEG_VOLUME_TABLES,
    }
}

/// Loads the tables of `kind`; `None` when an optional table is absent.
pub fn load_tables(work_dir: &Path, kind: OutputKind) -> Result<Option<Vec<DataFrame>>> {
    let mut tables = Vec::new();
    for source in table_sources(kind) {
        let path = work_dir.join(source.file_name);
        if !source.required && !path.is_file() {
            info!(kind = %kind, table = source.file_name, "optional table absent, skipping output");
            return Ok(None);
        }
        let df = read_table(&path, source.format)
            .with_context(|| format!("load {} table {}", kind, path.display()))?;
        tables.push(df);
    }
    Ok(Some(tables))
}

/// The configured identifier, or one derived from the input directory.
pub fn acquisition_id(config: &RunConfig) -> Result<AcquisitionId> {
    match &config.acquisition_id {
        Some(id) => Ok(id.clone()),
        None => source_identifier(&config.input_dir).with_context(|| {
            format!(
                "derive acquisition identifier from {}",
                config.input_dir.display()
            )
        }),
    }
}

/// Builds the demographic record for the configured destination.
pub fn resolve_demographics<C>(
    client: &C,
    config: &RunConfig,
) -> Result<(DemographicRecord, Resolution)>
where
    C: MetadataClient + ?Sized,
{
    let id = acquisition_id(config)?;
    let resolver = AgeResolver::new(client)
        .with_filter(config.acquisition_filter.clone())
        .with_policy(config.candidate_policy);
    let (record, resolution) = gather_demographics(&resolver, &config.destination_id, id)
        .with_context(|| format!("resolve demographics for {}", config.destination_id))?;

    let age = record.age.value().to_string();
    info!(
        subject = %record.subject_label,
        session = %record.session_label,
        acquisition = %record.acquisition_id,
        age = redact_value(&age),
        age_unit = %record.age.unit(),
        age_source = %resolution.age_source,
        sex = redact_value(record.sex.as_str()),
        "demographic record"
    );
    Ok((record, resolution))
}

/// Assembles and writes every output kind whose tables are present.
pub fn write_outputs(
    record: &DemographicRecord,
    work_dir: &Path,
    output_dir: &Path,
) -> Result<Vec<OutputSummary>> {
    let mut writer = OutputWriter::new(output_dir);
    let mut summaries = Vec::with_capacity(OutputKind::ALL.len());

    for kind in OutputKind::ALL {
        let Some(tables) = load_tables(work_dir, kind)? else {
            summaries.push(OutputSummary {
                kind,
                path: None,
                columns: 0,
            });
            continue;
        };
        let refs: Vec<&DataFrame> = tables.iter().collect();
        let mut out =
            assemble_all(record, &refs).with_context(|| format!("assemble {kind} output"))?;
        debug!(kind = %kind, tables = refs.len(), columns = out.width(), "assembled output");
        let path = writer
            .write(&record.acquisition_id, kind, &mut out)
            .with_context(|| format!("write {kind} output"))?;
        summaries.push(OutputSummary {
            kind,
            path: Some(path),
            columns: out.width(),
        });
    }
    Ok(summaries)
}

/// Full run. Demographics are resolved before the analysis script starts so
/// an unresolvable age fails the job without waiting on the analysis.
pub fn run<C>(client: &C, config: &RunConfig) -> Result<RunSummary>
where
    C: MetadataClient + ?Sized,
{
    let span = info_span!("run", destination = %config.destination_id);
    let _guard = span.enter();

    let (record, resolution) = resolve_demographics(client, config)?;

    if let Some(command) = &config.analysis_command {
        run_analysis(command)?;
    } else {
        info!("analysis script skipped");
    }

    let outputs = write_outputs(&record, &config.work_dir, &config.output_dir)?;
    info!(
        written = outputs.iter().filter(|output| output.path.is_some()).count(),
        output_dir = %config.output_dir.display(),
        "run complete"
    );
    Ok(RunSummary {
        record,
        resolution,
        output_dir: config.output_dir.clone(),
        outputs,
    })
}
