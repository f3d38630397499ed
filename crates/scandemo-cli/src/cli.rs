//! CLI argument definitions.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

use scandemo_cli::config::{
    DEFAULT_ANALYSIS_COMMAND, DEFAULT_CONFIG_PATH, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR,
    DEFAULT_WORK_DIR,
};

#[derive(Parser)]
#[command(
    name = "scandemo",
    version,
    about = "Resolve subject demographics and assemble analysis outputs",
    long_about = "Resolve a subject's age at scan and sex from imaging metadata, then\n\
                  prepend them to the single-row analysis tables and write one CSV\n\
                  per output kind."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log demographic values (age, sex) instead of redacting them.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the analysis script and write the demographic-prefixed outputs.
    Run(RunArgs),

    /// Resolve and print the demographic record only.
    Resolve(ResolveArgs),

    /// Print the canonical identifier derived from a file name.
    Sanitize(SanitizeArgs),
}

impl Command {
    /// Config file the command reads, if any.
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Self::Run(args) => Some(args.source.config.as_path()),
            Self::Resolve(args) => Some(args.source.config.as_path()),
            Self::Sanitize(_) => None,
        }
    }
}

/// Where the metadata and the identifier come from.
#[derive(Args)]
pub struct SourceArgs {
    /// Job configuration (`inputs.api-key.key`, `destination.id`, `config.debug`).
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// JSON export of the metadata tree.
    #[arg(long = "metadata", value_name = "PATH")]
    pub metadata: PathBuf,

    /// Directory holding the input image; its file name names the outputs.
    #[arg(long = "input-dir", value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Use this identifier instead of deriving one from the input file.
    #[arg(long = "acquisition-id", value_name = "ID")]
    pub acquisition_id: Option<String>,

    /// Fail when more than one acquisition file qualifies.
    ///
    /// By default the file with the earliest series date is used.
    #[arg(long = "require-single-candidate")]
    pub require_single_candidate: bool,

    /// Marker an acquisition label must contain (repeatable; default T2 and AXI).
    #[arg(long = "include-label", value_name = "TEXT")]
    pub include_label: Vec<String>,

    /// Marker an acquisition label must not contain (repeatable; default
    /// Segmentation and Align).
    #[arg(long = "exclude-label", value_name = "TEXT")]
    pub exclude_label: Vec<String>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory where the analysis script leaves its tables.
    #[arg(long = "work-dir", value_name = "DIR", default_value = DEFAULT_WORK_DIR)]
    pub work_dir: PathBuf,

    /// Directory for the assembled CSV outputs.
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Analysis script, run through `sh -c` before assembly.
    #[arg(
        long = "analysis-command",
        value_name = "COMMAND",
        default_value = DEFAULT_ANALYSIS_COMMAND
    )]
    pub analysis_command: String,

    /// Assemble tables already present in the work directory.
    #[arg(long = "skip-analysis")]
    pub skip_analysis: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the record as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct SanitizeArgs {
    /// Raw input file name.
    #[arg(value_name = "FILENAME")]
    pub filename: String,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
