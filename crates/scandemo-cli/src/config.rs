//! Run configuration.
//!
//! The platform hands the job a JSON document (`config.json`). Only a few
//! keys are read from it; everything else about a run comes from CLI flags.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use scandemo_model::AcquisitionId;
use scandemo_resolve::{AcquisitionFilter, CandidatePolicy};

pub const DEFAULT_CONFIG_PATH: &str = "/flywheel/v0/config.json";
pub const DEFAULT_INPUT_DIR: &str = "/flywheel/v0/input/input";
pub const DEFAULT_WORK_DIR: &str = "/flywheel/v0/work";
pub const DEFAULT_OUTPUT_DIR: &str = "/flywheel/v0/output";
pub const DEFAULT_ANALYSIS_COMMAND: &str = "/flywheel/v0/app/main.sh";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config key {0} is missing or empty")]
    MissingKey(&'static str),
}

/// The subset of `config.json` the runner reads.
#[derive(Debug, Default, Deserialize)]
pub struct GearConfig {
    #[serde(default)]
    pub config: GearOptions,
    #[serde(default)]
    pub inputs: GearInputs,
    #[serde(default)]
    pub destination: Option<Destination>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GearOptions {
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct GearInputs {
    #[serde(rename = "api-key", default)]
    pub api_key: Option<ApiKeyInput>,
}

#[derive(Default, Deserialize)]
pub struct ApiKeyInput {
    #[serde(default)]
    pub key: Option<String>,
}

impl fmt::Debug for ApiKeyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyInput")
            .field("key", &self.key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Destination {
    pub id: String,
}

impl GearConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `inputs.api-key.key`.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.inputs
            .api_key
            .as_ref()
            .and_then(|input| input.key.as_deref())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingKey("inputs.api-key.key"))
    }

    /// `destination.id`: the analysis container the run writes into.
    pub fn destination_id(&self) -> Result<&str, ConfigError> {
        self.destination
            .as_ref()
            .map(|destination| destination.id.trim())
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingKey("destination.id"))
    }

    pub fn debug(&self) -> bool {
        self.config.debug
    }
}

/// Everything one run needs, resolved once at startup.
#[derive(Clone)]
pub struct RunConfig {
    /// Credential for the live platform client.
    pub api_key: String,
    pub destination_id: String,
    pub input_dir: PathBuf,
    pub work_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Analysis script run before assembly; `None` skips it.
    pub analysis_command: Option<String>,
    pub candidate_policy: CandidatePolicy,
    pub acquisition_filter: AcquisitionFilter,
    /// Explicit identifier; derived from the input directory when `None`.
    pub acquisition_id: Option<AcquisitionId>,
}

impl RunConfig {
    /// Pulls the required keys out of `gear`, with default directories.
    pub fn from_gear(gear: &GearConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: gear.api_key()?.to_string(),
            destination_id: gear.destination_id()?.to_string(),
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            analysis_command: Some(DEFAULT_ANALYSIS_COMMAND.to_string()),
            candidate_policy: CandidatePolicy::default(),
            acquisition_filter: AcquisitionFilter::default(),
            acquisition_id: None,
        })
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("api_key", &"***")
            .field("destination_id", &self.destination_id)
            .field("input_dir", &self.input_dir)
            .field("work_dir", &self.work_dir)
            .field("output_dir", &self.output_dir)
            .field("analysis_command", &self.analysis_command)
            .field("candidate_policy", &self.candidate_policy)
            .field("acquisition_filter", &self.acquisition_filter)
            .field("acquisition_id", &self.acquisition_id)
            .finish()
    }
}
