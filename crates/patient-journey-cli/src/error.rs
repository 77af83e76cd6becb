//! CLI errors and exit code mapping.
//!
//! Exit codes:
//! - 0: Success (JSON report on stdout)
//! - 1: Recoverable failure (stderr), rerunning with other input or config can succeed
//! - 2: Blocking failure (stderr), the store is unreachable or its data is corrupted

use std::path::PathBuf;
use std::process::ExitCode;

use patient_journey_core::PipelineError;
use thiserror::Error;

/// Exit codes for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    /// Stage completed
    Success = 0,
    /// Missing data, failed precondition, bad configuration or a storage error
    Warning = 1,
    /// Store connectivity or corruption. Later stages must not run.
    Blocking = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

impl From<&PipelineError> for CliExitCode {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::Connectivity { .. } => CliExitCode::Blocking,
            PipelineError::Corrupted(_) => CliExitCode::Blocking,

            PipelineError::DataAbsent { .. } => CliExitCode::Warning,
            PipelineError::Precondition(_) => CliExitCode::Warning,
            PipelineError::Config(_) => CliExitCode::Warning,
            PipelineError::Storage(_) => CliExitCode::Warning,
        }
    }
}

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A CSV export could not be read or has inconsistent rows.
    #[error("Failed to read CSV '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to render JSON output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

impl From<&CliError> for CliExitCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::Pipeline(e) => CliExitCode::from(e),
            CliError::Csv { .. } => CliExitCode::Warning,
            CliError::Output(_) => CliExitCode::Warning,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
