//! `EmailThreadAnalysis` — the LLM's structured read of a reconstructed
//! email thread (spec §3, §4.6).

use crate::document::{LegalSignificance, RiskFlag};
use crate::validate::{check_confidence, check_non_empty, SchemaError, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum AuthorityLevel {
    Executive,
    Management,
    Employee,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum CommunicationPattern {
    Professional,
    Escalating,
    Hostile,
    Retaliatory,
    Conciliatory,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Participant {
    pub email: String,
    pub display_name: String,
    pub authority_level: AuthorityLevel,
    pub deference_score: f32,
    pub dominant_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct EmailThreadAnalysis {
    pub participants: Vec<Participant>,
    pub communication_pattern: CommunicationPattern,
    pub sentiment_progression: Vec<String>,
    pub escalation_events: Vec<String>,
    pub legal_significance: LegalSignificance,
    pub risk_flags: Vec<RiskFlag>,
    pub confidence_overall: f32,
}

impl Validate for EmailThreadAnalysis {
    fn validate(&self) -> Result<(), SchemaError> {
        check_confidence("confidence_overall", self.confidence_overall)?;
        for (index, participant) in self.participants.iter().enumerate() {
            check_non_empty("participants[].email", &participant.email).map_err(|_| {
                SchemaError::InvalidListItem {
                    field: "participants",
                    index,
                    reason: "empty email".to_string(),
                }
            })?;
            if !(0.0..=1.0).contains(&participant.deference_score) {
                return Err(SchemaError::InvalidListItem {
                    field: "participants",
                    index,
                    reason: format!(
                        "deference_score {} out of range",
                        participant.deference_score
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> EmailThreadAnalysis {
        EmailThreadAnalysis {
            participants: vec![Participant {
                email: "boss@example.com".to_string(),
                display_name: "Boss".to_string(),
                authority_level: AuthorityLevel::Management,
                deference_score: 0.2,
                dominant_topics: vec!["scheduling".to_string()],
            }],
            communication_pattern: CommunicationPattern::Professional,
            sentiment_progression: vec!["neutral".to_string()],
            escalation_events: vec![],
            legal_significance: LegalSignificance::Low,
            risk_flags: vec![],
            confidence_overall: 0.75,
        }
    }

    #[test]
    fn valid_thread_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn bad_deference_score_fails() {
        let mut t = valid();
        t.participants[0].deference_score = 3.0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn empty_participant_email_fails() {
        let mut t = valid();
        t.participants[0].email.clear();
        assert!(t.validate().is_err());
    }
}
