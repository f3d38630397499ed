use anyhow::{Context, Result};

use scandemo_cli::config::{GearConfig, RunConfig};
use scandemo_cli::pipeline::{resolve_demographics, run};
use scandemo_cli::types::RunSummary;
use scandemo_model::{AcquisitionId, DemographicRecord};
use scandemo_resolve::{AcquisitionFilter, CandidatePolicy, Resolution, SnapshotClient};

use crate::cli::{ResolveArgs, RunArgs, SanitizeArgs, SourceArgs};

pub fn run_pipeline(args: &RunArgs, gear: &GearConfig) -> Result<RunSummary> {
    let mut config = run_config(&args.source, gear)?;
    config.work_dir.clone_from(&args.work_dir);
    config.output_dir.clone_from(&args.output_dir);
    config.analysis_command = if args.skip_analysis {
        None
    } else {
        Some(args.analysis_command.clone())
    };
    let client = load_client(&args.source)?;
    run(&client, &config)
}

pub fn run_resolve(
    args: &ResolveArgs,
    gear: &GearConfig,
) -> Result<(DemographicRecord, Resolution)> {
    let config = run_config(&args.source, gear)?;
    let client = load_client(&args.source)?;
    resolve_demographics(&client, &config)
}

pub fn run_sanitize(args: &SanitizeArgs) -> Result<AcquisitionId> {
    AcquisitionId::from_filename(&args.filename)
        .with_context(|| format!("derive identifier from {:?}", args.filename))
}

fn run_config(source: &SourceArgs, gear: &GearConfig) -> Result<RunConfig> {
    let mut config = RunConfig::from_gear(gear)?;
    config.input_dir.clone_from(&source.input_dir);
    if source.require_single_candidate {
        config.candidate_policy = CandidatePolicy::RequireSingle;
    }
    config.acquisition_filter = acquisition_filter(source);
    config.acquisition_id = source
        .acquisition_id
        .as_deref()
        .map(AcquisitionId::new)
        .transpose()
        .context("parse --acquisition-id")?;
    Ok(config)
}

fn acquisition_filter(source: &SourceArgs) -> AcquisitionFilter {
    let mut filter = AcquisitionFilter::default();
    if !source.include_label.is_empty() {
        filter.include.clone_from(&source.include_label);
    }
    if !source.exclude_label.is_empty() {
        filter.exclude.clone_from(&source.exclude_label);
    }
    filter
}

fn load_client(source: &SourceArgs) -> Result<SnapshotClient> {
    SnapshotClient::from_path(&source.metadata)
        .with_context(|| format!("load metadata export {}", source.metadata.display()))
}
