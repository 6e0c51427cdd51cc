//! `CaseSummary` — the two-phase case synthesis output (spec §3, §4.9).
//!
//! §9's open question about `overall_assessment` accepting arbitrary keys
//! is resolved here with a closed [`Enhancement`] variant per domain
//! family rather than a free-form map (see `DESIGN.md`).

use crate::unified::{AnalysisPayload, UnifiedAnalysis};
use crate::validate::{check_confidence, check_non_empty, SchemaError, Validate};
use evidentia_core::{EvidenceId, EvidenceType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct EvidenceCatalogEntry {
    pub evidence_id: EvidenceId,
    pub evidence_type: EvidenceType,
    pub short_description: String,
}

impl EvidenceCatalogEntry {
    /// Builds a catalog entry from a persisted analysis record, the one
    /// place both the summarizer (phase A's evidence catalog input) and
    /// the package assembler (the on-disk `catalog.json`) derive a
    /// human-readable description from (spec §4.9, §4.10).
    pub fn from_analysis(analysis: &UnifiedAnalysis) -> Result<Self, SchemaError> {
        let evidence_id = EvidenceId::from_hex(analysis.file_metadata.sha256.clone())
            .map_err(|e| SchemaError::Other(e.to_string()))?;
        let short_description = match &analysis.payload {
            AnalysisPayload::Document(doc) => doc.summary.clone(),
            AnalysisPayload::Email(email) => email
                .escalation_events
                .first()
                .cloned()
                .unwrap_or_else(|| format!("email thread with {} participants", email.participants.len())),
            AnalysisPayload::Image(image) => image.summary.clone(),
        };
        Ok(Self {
            evidence_id,
            evidence_type: analysis.evidence_type,
            short_description,
        })
    }
}

/// The closed, documented fields a domain enhancement pass may add (spec
/// §4.9 phase B). `tribunal_probability` only appears for the
/// workplace/employment families (§4.9's own carve-out).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "domain", deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum Enhancement {
    Generic {
        financial_exposure_summary: String,
        claim_strength_summary: String,
        settlement_recommendation: String,
        immediate_actions: Vec<String>,
    },
    Workplace {
        tribunal_probability: f32,
        financial_exposure_summary: String,
        claim_strength_summary: String,
        settlement_recommendation: String,
        immediate_actions: Vec<String>,
    },
    Employment {
        tribunal_probability: f32,
        financial_exposure_summary: String,
        claim_strength_summary: String,
        settlement_recommendation: String,
        immediate_actions: Vec<String>,
    },
    Contract {
        financial_exposure_summary: String,
        claim_strength_summary: String,
        settlement_recommendation: String,
        immediate_actions: Vec<String>,
    },
}

impl Validate for Enhancement {
    fn validate(&self) -> Result<(), SchemaError> {
        match self {
            Enhancement::Workplace {
                tribunal_probability,
                ..
            }
            | Enhancement::Employment {
                tribunal_probability,
                ..
            } => check_confidence("tribunal_probability", *tribunal_probability),
            Enhancement::Generic { .. } | Enhancement::Contract { .. } => Ok(()),
        }
    }
}

/// The union of phase-A and phase-B outputs under known, documented keys
/// (spec §4.9: "no arbitrary map contents").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OverallAssessment {
    pub forensic_summary: String,
    pub legal_implications: String,
    pub risk_assessment: String,
    pub enhancement: Option<Enhancement>,
}

/// Current schema version for `CaseSummary`.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CaseSummary {
    pub schema_version: u32,
    pub case_id: String,
    pub forensic_summary: String,
    pub legal_implications: String,
    pub recommended_actions: Vec<String>,
    pub risk_assessment: String,
    pub evidence_catalog: Vec<EvidenceCatalogEntry>,
    pub overall_assessment: OverallAssessment,
    pub enhancement_applied: bool,
}

impl CaseSummary {
    /// The shape required by §8 boundary behavior: "Evidence count = 0 ...
    /// summary phase emits a 'no evidence' CaseSummary".
    pub fn no_evidence(case_id: impl Into<String>) -> Self {
        let case_id = case_id.into();
        let forensic_summary = "No evidence was submitted for this case.".to_string();
        Self {
            schema_version: SCHEMA_VERSION,
            case_id,
            forensic_summary: forensic_summary.clone(),
            legal_implications: "None — no evidence to assess.".to_string(),
            recommended_actions: vec![],
            risk_assessment: "Not assessable without evidence.".to_string(),
            evidence_catalog: vec![],
            overall_assessment: OverallAssessment {
                forensic_summary,
                legal_implications: "None — no evidence to assess.".to_string(),
                risk_assessment: "Not assessable without evidence.".to_string(),
                enhancement: None,
            },
            enhancement_applied: false,
        }
    }
}

impl Validate for CaseSummary {
    fn validate(&self) -> Result<(), SchemaError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SchemaError::VersionMismatch {
                expected: SCHEMA_VERSION,
                actual: self.schema_version,
            });
        }
        check_non_empty("forensic_summary", &self.forensic_summary)?;
        if let Some(enhancement) = &self.overall_assessment.enhancement {
            enhancement.validate()?;
        }
        if self.enhancement_applied != self.overall_assessment.enhancement.is_some() {
            return Err(SchemaError::Other(
                "enhancement_applied flag disagrees with overall_assessment.enhancement"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
