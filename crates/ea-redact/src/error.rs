//! Error types for the redaction engine.

use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactError>;

/// Errors that can occur while building the engine.
///
/// Redacting a document never fails; every variant here is raised while
/// constructing detectors, masks, or profiles.
#[derive(Error, Debug)]
pub enum RedactError {
    /// A custom pattern or name could not be compiled into a detector.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The mask configuration is inconsistent.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// I/O error while reading or writing a profile or names file.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// Profile parsing error.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RedactError {
    pub(crate) fn invalid_pattern(pattern: impl Into<String>, reason: impl ToString) -> Self {
        RedactError::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error comes from user-supplied configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RedactError::InvalidPattern { .. }
                | RedactError::ConfigurationError(_)
                | RedactError::JsonError(_)
        )
    }
}
