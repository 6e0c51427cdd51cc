//! Cross-evidence correlation and timeline record types produced by C8/C9
//! (spec §3, §4.8, §4.8.4, §4.8.5).

use crate::entity::EntityType;
use crate::validate::{check_confidence, check_non_empty, SchemaError, Validate};
use chrono::{DateTime, Utc};
use evidentia_core::EvidenceId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

/// A single canonical entity's aggregate across a case (spec §3, §4.8.1).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CorrelationRecord {
    pub entity_name: String,
    pub entity_type: EntityType,
    pub occurrence_count: usize,
    pub evidence_ids: Vec<EvidenceId>,
    pub contexts: Vec<String>,
    pub confidence_average: f32,
}

impl Validate for CorrelationRecord {
    fn validate(&self) -> Result<(), SchemaError> {
        check_non_empty("entity_name", &self.entity_name)?;
        check_confidence("confidence_average", self.confidence_average)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TimelineEvent {
    pub timestamp: DateTime<Utc>,
    pub evidence_id: EvidenceId,
    pub event_type: String,
    pub description: String,
    pub confidence: f32,
}

impl Validate for TimelineEvent {
    fn validate(&self) -> Result<(), SchemaError> {
        check_confidence("confidence", self.confidence)?;
        Ok(())
    }
}

/// A maximal run of events judged causally or topically related (spec
/// §4.8.4).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TemporalSequence {
    pub events: Vec<TimelineEvent>,
    pub linking_reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum GapSignificance {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct TimelineGap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub days: i64,
    pub significance: GapSignificance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum CorroborationStrength {
    Strong,
    Moderate,
    Weak,
}

/// One of the three legal-pattern variants the pattern detector emits
/// (spec §4.8.5).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "pattern_type", deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum LegalPattern {
    Contradiction {
        severity: f32,
        description: String,
        supporting_evidence_ids: Vec<EvidenceId>,
    },
    Corroboration {
        strength: CorroborationStrength,
        description: String,
        supporting_evidence_ids: Vec<EvidenceId>,
    },
    EvidenceGap {
        description: String,
        supporting_evidence_ids: Vec<EvidenceId>,
    },
}

impl Validate for LegalPattern {
    fn validate(&self) -> Result<(), SchemaError> {
        match self {
            LegalPattern::Contradiction {
                severity,
                description,
                ..
            } => {
                check_confidence("severity", *severity)?;
                check_non_empty("description", description)
            }
            LegalPattern::Corroboration { description, .. } => {
                check_non_empty("description", description)
            }
            LegalPattern::EvidenceGap { description, .. } => {
                check_non_empty("description", description)
            }
        }
    }
}

/// Current schema version for `CorrelationAnalysis`.
pub const SCHEMA_VERSION: u32 = 1;

/// The per-case output of the correlation engine (spec §3, §4.8).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CorrelationAnalysis {
    pub schema_version: u32,
    pub case_id: String,
    pub correlations: Vec<CorrelationRecord>,
    pub timeline: Vec<TimelineEvent>,
    pub sequences: Vec<TemporalSequence>,
    pub gaps: Vec<TimelineGap>,
    pub patterns: Vec<LegalPattern>,
    pub ai_resolution_applied: bool,
}

impl CorrelationAnalysis {
    pub fn empty(case_id: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            case_id: case_id.into(),
            correlations: Vec::new(),
            timeline: Vec::new(),
            sequences: Vec::new(),
            gaps: Vec::new(),
            patterns: Vec::new(),
            ai_resolution_applied: false,
        }
    }
}

impl Validate for CorrelationAnalysis {
    fn validate(&self) -> Result<(), SchemaError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(SchemaError::VersionMismatch {
                expected: SCHEMA_VERSION,
                actual: self.schema_version,
            });
        }
        for record in &self.correlations {
            record.validate()?;
        }
        for event in &self.timeline {
            event.validate()?;
        }
        for pattern in &self.patterns {
            pattern.validate()?;
        }
        // Testable property 3 / invariant 4: no two correlation records
        // share (normalize(name), entity_type). Normalization itself lives
        // in `evidentia-correlate`; here we only check literal-key
        // uniqueness on the fields this record actually carries, since
        // the schema crate must not depend on the correlation engine.
        let mut seen = std::collections::HashSet::new();
        for record in &self.correlations {
            let key = (record.entity_name.to_ascii_lowercase(), record.entity_type);
            if !seen.insert(key) {
                return Err(SchemaError::Other(format!(
                    "duplicate correlation record for '{}' ({:?})",
                    record.entity_name, record.entity_type
                )));
            }
        }
        Ok(())
    }
}
