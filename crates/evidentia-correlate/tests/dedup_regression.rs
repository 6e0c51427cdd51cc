//! Regression coverage for the mandatory deduplication pass (spec §4.8.3):
//! a prior version of this engine shipped without it and produced
//! duplicate correlation records for the same real-world entity.

use evidentia_core::{Config, EvidenceId, EvidenceType, FileMetadata};
use evidentia_correlate::correlate_case;
use evidentia_llm::testing::FakeProvider;
use evidentia_schema::document::{DocumentAnalysis, LegalSignificance, Sentiment};
use evidentia_schema::entity::{Entity, EntityType};
use evidentia_schema::{AnalysisPayload, UnifiedAnalysis};

fn metadata(bytes: &[u8]) -> FileMetadata {
    let id = EvidenceId::from_bytes(bytes);
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

fn doc_with_entity(bytes: &[u8], name: &str) -> UnifiedAnalysis {
    UnifiedAnalysis::new(
        EvidenceType::Document,
        "model-x",
        "fp",
        metadata(bytes),
        AnalysisPayload::Document(DocumentAnalysis {
            summary: "a memo".to_string(),
            entities: vec![Entity {
                name: name.to_string(),
                entity_type: EntityType::Person,
                confidence: 0.9,
                context: format!("{name} is mentioned here"),
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
async fn five_variant_mentions_across_five_items_resolve_to_one_record() {
    let analyses = vec![
        doc_with_entity(b"e1", "Sarah Johnson"),
        doc_with_entity(b"e2", "Sarah Johnson"),
        doc_with_entity(b"e3", "Sarah Johnson"),
        doc_with_entity(b"e4", "Sarah"),
        doc_with_entity(b"e5", "S. Johnson"),
    ];

    let disambiguation_response = serde_json::json!({
        "groups": [{
            "canonical_name": "Sarah Johnson",
            "variant_names": ["Sarah", "S. Johnson"],
            "confidence": 0.95
        }]
    });
    let empty_patterns = serde_json::json!({
        "contradictions": [],
        "corroboration": [],
        "evidence_gaps": []
    });
    let fake = FakeProvider::new()
        .then_respond(disambiguation_response)
        .then_respond(empty_patterns);

    let config = Config::with_api_key("k").with_ai_resolve_entities(true);
    let result = correlate_case(&fake, &config, "case-1", &analyses).await.unwrap();

    assert!(result.ai_resolution_applied);
    assert_eq!(result.correlations.len(), 1);
    assert_eq!(result.correlations[0].entity_name, "Sarah Johnson");
    assert_eq!(result.correlations[0].occurrence_count, 5);
}
