//! `DocumentAnalysis` — the structured extraction produced by the
//! document analyzer (C5) over plain text (spec §3, §4.5).

use crate::entity::Entity;
use crate::validate::{check_confidence, check_non_empty, SchemaError, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum Sentiment {
    Hostile,
    Neutral,
    Professional,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum LegalSignificance {
    Critical,
    High,
    Medium,
    Low,
}

/// A risk or noteworthy condition flagged during analysis. Represented as
/// a closed string tag rather than a free-form message, so §8 "every enum
/// field is in its declared domain" extends to flags too, while still
/// allowing the analyzer to emit the handful of operationally meaningful
/// tags this spec names (e.g. `truncated_input`, spec §4.5).
pub type RiskFlag = String;

/// The well-known risk flag the document analyzer must emit whenever its
/// input text was truncated before being sent to the LLM (spec §4.5).
pub const TRUNCATED_INPUT_FLAG: &str = "truncated_input";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DocumentAnalysis {
    pub summary: String,
    pub entities: Vec<Entity>,
    pub document_type: String,
    pub sentiment: Sentiment,
    pub legal_significance: LegalSignificance,
    pub risk_flags: Vec<RiskFlag>,
    pub confidence_overall: f32,
}

impl Validate for DocumentAnalysis {
    fn validate(&self) -> Result<(), SchemaError> {
        check_non_empty("summary", &self.summary)?;
        check_non_empty("document_type", &self.document_type)?;
        check_confidence("confidence_overall", self.confidence_overall)?;
        for (index, entity) in self.entities.iter().enumerate() {
            if !entity.is_confidence_valid() {
                return Err(SchemaError::InvalidListItem {
                    field: "entities",
                    index,
                    reason: format!("confidence {} out of range", entity.confidence),
                });
            }
            if entity.name.trim().is_empty() {
                return Err(SchemaError::InvalidListItem {
                    field: "entities",
                    index,
                    reason: "empty entity name".to_string(),
                });
            }
        }
        Ok(())
    }
}
