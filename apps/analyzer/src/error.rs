use thiserror::Error;

use crate::domain::DomainError;

/// Fatal failures of the analyzer's outer surfaces. Decoding, classification,
/// scoring and comparison report problems as values instead.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Archive has no `{container}` array")]
    MissingContainer { container: &'static str },
    #[error("Invalid archive: {detail}")]
    InvalidArchive { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AnalyzerError {
    pub fn config(detail: impl Into<String>) -> Self {
        AnalyzerError::Config {
            detail: detail.into(),
        }
    }

    pub fn invalid_archive(detail: impl Into<String>) -> Self {
        AnalyzerError::InvalidArchive {
            detail: detail.into(),
        }
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzerError::invalid_archive(e.to_string())
    }
}
