use thiserror::Error;

/// Errors raised by `evidentia-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("provider API key missing from environment variable {0}")]
    MissingApiKey(String),

    #[error("invalid evidence id: {0}")]
    InvalidEvidenceId(String),

    #[error("configuration value out of range: {field} = {value}")]
    ConfigOutOfRange { field: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
