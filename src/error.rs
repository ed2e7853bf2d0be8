use std::path::PathBuf;

use thiserror::Error;

/// Type alias for Result with FilterError
pub type Result<T> = std::result::Result<T, FilterError>;

/// Error types for corpus loading, configuration and reporting.
///
/// The classifier model itself never fails; every variant here originates in the
/// I/O layer around it.
#[derive(Error, Debug)]
pub enum FilterError {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A corpus directory or document could not be used
    #[error("Corpus error at {path:?}: {message}")]
    CorpusError { path: PathBuf, message: String },

    /// A corpus directory held no documents
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),
}

impl FilterError {
    pub fn corpus(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FilterError::CorpusError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if the error was caused by caller input rather than the filesystem
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FilterError::ConfigError(_)
                | FilterError::CorpusError { .. }
                | FilterError::EmptyCorpus(_)
        )
    }
}
