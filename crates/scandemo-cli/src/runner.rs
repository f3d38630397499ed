//! Blocking invocation of the external analysis script.

use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

use thiserror::Error;
use tracing::{info, info_span};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to start analysis command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("analysis command `{command}` failed with {status}")]
    Failed { command: String, status: ExitStatus },
}

/// Runs `command` through `sh -c` and waits for it.
///
/// The script's stdout and stderr are inherited so its progress streams
/// straight to the job log.
pub fn run_analysis(command: &str) -> Result<(), AnalysisError> {
    let span = info_span!("analysis", command = %command);
    let _guard = span.enter();
    let start = Instant::now();
    info!("starting analysis script");

    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| AnalysisError::Spawn {
            command: command.to_string(),
            source: e,
        })?;

    if !status.success() {
        return Err(AnalysisError::Failed {
            command: command.to_string(),
            status,
        });
    }
    info!(
        duration_ms = start.elapsed().as_millis(),
        "analysis script finished"
    );
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn success_returns_ok() {
        run_analysis("true").unwrap();
    }

    #[test]
    fn nonzero_exit_is_reported() {
        match run_analysis("exit 3").unwrap_err() {
            AnalysisError::Failed { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn script_side_effects_are_visible() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("done");
        run_analysis(&format!("touch '{}'", marker.display())).unwrap();
        assert!(marker.is_file());
    }
}
