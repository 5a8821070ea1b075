use std::path::PathBuf;
use thiserror::Error;

/// Failures of the external model capability.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("Model API key is not configured")]
    MissingApiKey,

    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Model API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response format from model: {0}")]
    MalformedResponse(String),

    #[error("This model provider does not accept attachments")]
    UnsupportedAttachments,

    #[error("Model call timed out after {0}s")]
    Timeout(u64),
}

/// Errors surfaced by the interpretation pipeline.
#[derive(Error, Debug)]
pub enum InterpretError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Prompt template not found: {}. Ensure the ANC extraction prompt file exists",
        path.display()
    )]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Text extraction failed: {0}")]
    Extraction(String),
}

pub type Result<T> = std::result::Result<T, InterpretError>;
