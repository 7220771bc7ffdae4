//! Error types for the anonymizer CLI.

use crate::exit_codes::ExitCode;
use ea_redact::RedactError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can abort a run.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No input path was given.
    #[error("--input is required")]
    NoInput,

    /// The input path cannot be accessed.
    #[error("failed to access input path {path}: {source}")]
    InputMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing matched the extension and exclude filters.
    #[error("no files to process under {0}")]
    NoFiles(PathBuf),

    /// Detector, mask or profile configuration error.
    #[error(transparent)]
    Redact(#[from] RedactError),

    /// Directory traversal error.
    #[error("failed to collect files: {0}")]
    Collect(#[from] walkdir::Error),

    /// A document could not be read or its redacted copy written.
    #[error("failed to redact {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV report error.
    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Run log sink failure.
    #[error("failed to write run log: {0}")]
    RunLog(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn document(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Document {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CoreError::NoInput | CoreError::InputMissing { .. } | CoreError::NoFiles(_) => {
                ExitCode::ArgsError
            }
            CoreError::Redact(err) if err.is_config_error() => ExitCode::ConfigError,
            CoreError::Redact(_) => ExitCode::IoError,
            CoreError::Collect(_)
            | CoreError::Document { .. }
            | CoreError::Csv(_)
            | CoreError::RunLog(_)
            | CoreError::Io(_) => ExitCode::IoError,
            CoreError::Json(_) => ExitCode::InternalError,
        }
    }
}
