//! Error handling for the resume scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScorerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("Empty document: no text could be extracted")]
    EmptyDocument,

    #[error("Protected document: {0}")]
    ProtectedDocument(String),

    #[error("Unknown role or level: {0}")]
    InvalidRoleOrLevel(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeScorerError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeScorerError {
    fn from(err: anyhow::Error) -> Self {
        ResumeScorerError::Processing(err.to_string())
    }
}

impl ResumeScorerError {
    /// Human-readable hint shown alongside parse failures.
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            ResumeScorerError::UnreadableDocument(_) => Some(
                "The document could not be read. It may be corrupted, \
                 password-protected, or a scanned image without a text layer.",
            ),
            ResumeScorerError::EmptyDocument => Some(
                "No text was found in the document. If it is a scan, export \
                 a text-based version and try again.",
            ),
            ResumeScorerError::ProtectedDocument(_) => Some(
                "The document is encrypted. Remove the password protection \
                 and upload it again.",
            ),
            _ => None,
        }
    }
}
