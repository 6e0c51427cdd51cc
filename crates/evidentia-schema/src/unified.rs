//! `UnifiedAnalysis` — the one persisted-per-item record shape, wrapping a
//! discriminated union of the three analyzer outputs (spec §3, §9 design
//! note: "Duck-typed analysis results become a tagged variant").

use crate::document::DocumentAnalysis;
use crate::email::EmailThreadAnalysis;
use crate::image::ImageAnalysis;
use crate::validate::{SchemaError, Validate};
use chrono::{DateTime, Utc};
use evidentia_core::{ChainEvent, EvidenceType, FileMetadata};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

/// Current schema version for `UnifiedAnalysis` (spec §3: "All types carry
/// a top-level schema version").
pub const SCHEMA_VERSION: u32 = 1;

/// The discriminated union of analyzer outputs. The variant must agree
/// with the enclosing record's `evidence_type`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum AnalysisPayload {
    Document(DocumentAnalysis),
    Email(EmailThreadAnalysis),
    Image(ImageAnalysis),
}

impl AnalysisPayload {
    pub fn matches_type(&self, evidence_type: EvidenceType) -> bool {
        matches!(
            (self, evidence_type),
            (AnalysisPayload::Document(_), EvidenceType::Document)
                | (AnalysisPayload::Email(_), EvidenceType::Email)
                | (
                    AnalysisPayload::Image(_),
                    EvidenceType::Image | EvidenceType::Pdf
                )
        )
    }
}

/// The one record persisted per analyzed evidence item at
/// `derived/sha256=<id>/analysis.v1.json` (spec §4.1).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UnifiedAnalysis {
    pub schema_version: u32,
    pub evidence_type: EvidenceType,
    pub analysis_timestamp: DateTime<Utc>,
    /// The model identifier used for this analysis, recorded so "cache
    /// correctness survives provider changes" (spec §6).
    pub model_used: String,
    /// `hash(evidence_id || analyzer_version || prompt_version ||
    /// model_id)` (spec §4.4). The dispatcher compares this against a
    /// freshly computed fingerprint to decide whether a cached record can
    /// be returned without calling the LLM again.
    pub fingerprint: String,
    pub file_metadata: FileMetadata,
    pub chain: Vec<ChainEvent>,
    pub case_ids: Vec<String>,
    pub payload: AnalysisPayload,
}

impl UnifiedAnalysis {
    pub fn new(
        evidence_type: EvidenceType,
        model_used: impl Into<String>,
        fingerprint: impl Into<String>,
        file_metadata: FileMetadata,
        payload: AnalysisPayload,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            evidence_type,
            analysis_timestamp: Utc::now(),
            model_used: model_used.into(),
            fingerprint: fingerprint.into(),
            file_metadata,
            chain: Vec::new(),
            case_ids: Vec::new(),
            payload,
        }
    }
}

impl Validate for UnifiedAnalysis {
    fn validate(&self) -> Result<(), SchemaError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SchemaError::VersionMismatch {
                expected: SCHEMA_VERSION,
                actual: self.schema_version,
            });
        }
        if !self.payload.matches_type(self.evidence_type) {
            return Err(SchemaError::Other(format!(
                "payload variant does not match evidence_type {}",
                self.evidence_type
            )));
        }
        match &self.payload {
            AnalysisPayload::Document(d) => d.validate(),
            AnalysisPayload::Email(e) => e.validate(),
            AnalysisPayload::Image(i) => i.validate(),
        }
    }
}
