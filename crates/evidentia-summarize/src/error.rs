//! Errors surfaced by the summarizer (C10).

use evidentia_llm::LlmError;
use evidentia_schema::validate::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type SummarizeResult<T> = Result<T, SummarizeError>;
