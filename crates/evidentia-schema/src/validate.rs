//! Schema validation: every record type implements [`Validate`], and every
//! validation failure is an error, never a silent coercion (spec §3).

use thiserror::Error;

/// A schema validation failure. Carries enough context (field + reason) to
/// surface "a pointer to the specific item that failed" (spec §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("field '{field}' must be in [0,1], got {value}")]
    ConfidenceOutOfRange { field: &'static str, value: f32 },

    #[error("field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    #[error("field '{field}' has an invalid enum value: {value}")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("list field '{field}' contains an invalid item at index {index}: {reason}")]
    InvalidListItem {
        field: &'static str,
        index: usize,
        reason: String,
    },

    #[error("schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: u32, actual: u32 },

    #[error("{0}")]
    Other(String),
}

/// Implemented by every persisted/produced record type (spec §3: "All
/// records are schema-validated on production and on ingestion from
/// disk").
pub trait Validate {
    fn validate(&self) -> Result<(), SchemaError>;
}

pub(crate) fn check_confidence(field: &'static str, value: f32) -> Result<(), SchemaError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SchemaError::ConfidenceOutOfRange { field, value })
    }
}

pub(crate) fn check_non_empty(field: &'static str, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        Err(SchemaError::EmptyField { field })
    } else {
        Ok(())
    }
}
