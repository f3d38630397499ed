//! `scandemo` command-line entry point.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use scandemo_cli::config::{ConfigError, GearConfig};
use scandemo_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_pipeline, run_resolve, run_sanitize};
use crate::summary::{print_record, print_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();

    // Read before logging starts so `config.debug` can set the level.
    let gear = cli.command.config_path().map(GearConfig::from_path).transpose();
    let debug = matches!(&gear, Ok(Some(config)) if config.debug());

    let log_config = log_config_from_cli(&cli, debug);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Sanitize(args) => run_sanitize(args).map(|id| println!("{id}")),
        Command::Run(args) => with_config(gear, |gear| {
            run_pipeline(args, gear).map(|summary| print_summary(&summary))
        }),
        Command::Resolve(args) => with_config(gear, |gear| {
            let (record, resolution) = run_resolve(args, gear)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record(&record, &resolution);
            }
            Ok(())
        }),
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn with_config<F>(gear: Result<Option<GearConfig>, ConfigError>, f: F) -> anyhow::Result<()>
where
    F: FnOnce(&GearConfig) -> anyhow::Result<()>,
{
    let gear = gear?.unwrap_or_default();
    f(&gear)
}

/// Build logging configuration from CLI flags with consistent precedence.
///
/// `--log-level` wins over `-v/-q`, which win over `RUST_LOG`, which wins over
/// `config.debug`.
fn log_config_from_cli(cli: &Cli, debug: bool) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if config.use_env_filter && debug {
        config.level_filter = LevelFilter::DEBUG;
    }
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
