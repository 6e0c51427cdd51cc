//! Correlation-engine error taxonomy (spec §7).

use evidentia_llm::LlmError;
use evidentia_schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorrelateError {
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    #[error("schema validation failed: {0}")]
    Schema(#[from] SchemaError),
}

pub type CorrelateResult<T> = Result<T, CorrelateError>;
