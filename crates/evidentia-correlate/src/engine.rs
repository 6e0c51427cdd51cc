//! The correlation engine orchestrator (C8/C9, spec §4.8): ties extraction,
//! canonicalization, optional AI disambiguation, deduplication, timeline
//! reconstruction, and pattern detection into one `CorrelationAnalysis`.

use crate::dedupe::{group_by_canonical, merge_duplicates, singles_of_type};
use crate::disambiguate::disambiguate;
use crate::error::CorrelateResult;
use crate::extract::collect_mentions;
use crate::patterns::detect_patterns;
use crate::timeline::{build_gaps, build_sequences, build_timeline};
use evidentia_core::Config;
use evidentia_llm::LlmProvider;
use evidentia_schema::entity::EntityType;
use evidentia_schema::validate::Validate;
use evidentia_schema::{CorrelationAnalysis, UnifiedAnalysis};

/// Runs the full correlation pipeline over every analysis in a case.
///
/// When `config.ai_resolve_entities` is set, person-type singles are sent
/// through one batched LLM disambiguation call before the mandatory
/// deduplication pass (spec §4.8.2–§4.8.3); otherwise only the
/// deterministic string-matched groups are deduplicated.
pub async fn correlate_case<P: LlmProvider>(
    provider: &P,
    config: &Config,
    case_id: &str,
    analyses: &[UnifiedAnalysis],
) -> CorrelateResult<CorrelationAnalysis> {
    let mentions = collect_mentions(analyses);
    tracing::info!(case_id, mention_count = mentions.len(), "collected raw entity mentions");
    let mut records = group_by_canonical(&mentions);

    let ai_resolution_applied = if config.ai_resolve_entities {
        let singles = singles_of_type(&records, EntityType::Person);
        if singles.is_empty() {
            false
        } else {
            tracing::debug!(case_id, single_count = singles.len(), "running AI disambiguation over person singles");
            let (synthetic, absorbed_names) = disambiguate(provider, &singles).await?;
            records.retain(|r| !absorbed_names.contains(&r.entity_name));
            records.extend(synthetic);
            true
        }
    } else {
        false
    };

    let correlations = merge_duplicates(records);
    tracing::info!(case_id, record_count = correlations.len(), ai_resolution_applied, "deduplicated correlation records");

    let timeline = build_timeline(analyses);
    let known_entity_names: Vec<String> = correlations.iter().map(|r| r.entity_name.clone()).collect();
    let sequences = build_sequences(&timeline, config.sequence_window_days, &known_entity_names);
    let gaps = build_gaps(&timeline, config.gap_threshold_days);

    let patterns = if correlations.is_empty() && timeline.is_empty() {
        Vec::new()
    } else {
        detect_patterns(provider, &correlations, &sequences, &gaps).await?
    };

    let analysis = CorrelationAnalysis {
        schema_version: evidentia_schema::correlation::SCHEMA_VERSION,
        case_id: case_id.to_string(),
        correlations,
        timeline,
        sequences,
        gaps,
        patterns,
        ai_resolution_applied,
    };
    analysis.validate()?;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_core::{EvidenceType, FileMetadata};
    use evidentia_llm::testing::FakeProvider;
    use evidentia_schema::document::{DocumentAnalysis, LegalSignificance, Sentiment};
    use evidentia_schema::entity::Entity;

    fn metadata(bytes: &[u8]) -> FileMetadata {
        let id = evidentia_core::EvidenceId::from_bytes(bytes);
        FileMetadata {
            path: "/x".to_string(),
            filename: "x".to_string(),
            size_bytes: 1,
            mime_type: None,
            extension: None,
            created_at: None,
            modified_at: None,
            sha256: id.as_hex().to_string(),
        }
    }

    fn doc_analysis(bytes: &[u8], name: &str) -> UnifiedAnalysis {
        UnifiedAnalysis::new(
            EvidenceType::Document,
            "model-x",
            "fp",
            metadata(bytes),
            evidentia_schema::AnalysisPayload::Document(DocumentAnalysis {
                summary: "s".to_string(),
                entities: vec![Entity {
                    name: name.to_string(),
                    entity_type: EntityType::Person,
                    confidence: 0.9,
                    context: format!("mention of {name}"),
                    quoted_text: None,
                    associated_event: None,
                    relationship: None,
                    role: None,
                }],
                document_type: "memo".to_string(),
                sentiment: Sentiment::Neutral,
                legal_significance: LegalSignificance::Low,
                risk_flags: vec![],
                confidence_overall: 0.8,
            }),
        )
    }

    #[tokio::test]
    async fn single_item_with_no_entities_has_empty_correlation_and_timeline() {
        let analysis = UnifiedAnalysis::new(
            EvidenceType::Document,
            "model-x",
            "fp",
            metadata(b"a"),
            evidentia_schema::AnalysisPayload::Document(DocumentAnalysis {
                summary: "s".to_string(),
                entities: vec![],
                document_type: "memo".to_string(),
                sentiment: Sentiment::Neutral,
                legal_significance: LegalSignificance::Low,
                risk_flags: vec![],
                confidence_overall: 0.8,
            }),
        );
        let config = Config::with_api_key("k");
        let fake = FakeProvider::new();
        let result = correlate_case(&fake, &config, "case-1", &[analysis]).await.unwrap();
        assert!(result.correlations.is_empty());
        assert!(result.timeline.is_empty());
        assert!(!result.ai_resolution_applied);
    }

    #[tokio::test]
    async fn without_ai_resolution_variant_names_stay_distinct() {
        let analyses = vec![doc_analysis(b"a", "Sarah Johnson"), doc_analysis(b"b", "Sarah")];
        let config = Config::with_api_key("k");
        let empty_patterns = serde_json::json!({
            "contradictions": [],
            "corroboration": [],
            "evidence_gaps": []
        });
        let fake = FakeProvider::new().then_respond(empty_patterns);
        let result = correlate_case(&fake, &config, "case-1", &analyses).await.unwrap();
        assert_eq!(result.correlations.len(), 2);
    }
}
