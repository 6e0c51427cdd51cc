//! Entity collection (spec §4.8.1 step 1): gathers every `Entity` from
//! `DocumentAnalysis`, participants from `EmailThreadAnalysis`, and
//! `detected_text` from `ImageAnalysis` into one flat list tagged with the
//! evidence item each one came from.

use evidentia_core::EvidenceId;
use evidentia_schema::entity::EntityType;
use evidentia_schema::{AnalysisPayload, UnifiedAnalysis};

/// One raw entity mention tagged with its source evidence item.
#[derive(Debug, Clone)]
pub struct RawMention {
    pub name: String,
    pub entity_type: EntityType,
    pub evidence_id: EvidenceId,
    pub context: String,
    pub confidence: f32,
}

/// Flattens every analysis in a case into raw entity mentions.
pub fn collect_mentions(analyses: &[UnifiedAnalysis]) -> Vec<RawMention> {
    let mut mentions = Vec::new();
    for analysis in analyses {
        match &analysis.payload {
            AnalysisPayload::Document(doc) => {
                for entity in &doc.entities {
                    mentions.push(RawMention {
                        name: entity.name.clone(),
                        entity_type: entity.entity_type,
                        evidence_id: evidence_id_of(analysis),
                        context: entity.context.clone(),
                        confidence: entity.confidence,
                    });
                }
            }
            AnalysisPayload::Email(email) => {
                for participant in &email.participants {
                    mentions.push(RawMention {
                        name: participant.display_name.clone(),
                        entity_type: EntityType::Person,
                        evidence_id: evidence_id_of(analysis),
                        context: format!("participant in email thread ({})", participant.email),
                        confidence: 0.9,
                    });
                }
            }
            AnalysisPayload::Image(image) => {
                if !image.detected_text.trim().is_empty() {
                    mentions.push(RawMention {
                        name: image.detected_text.clone(),
                        entity_type: EntityType::TextInImage,
                        evidence_id: evidence_id_of(analysis),
                        context: image.scene_description.clone(),
                        confidence: image.analysis_confidence,
                    });
                }
            }
        }
    }
    mentions
}

fn evidence_id_of(analysis: &UnifiedAnalysis) -> EvidenceId {
    EvidenceId::from_hex(analysis.file_metadata.sha256.clone())
        .expect("file_metadata.sha256 is always a valid EvidenceId hex string")
}
