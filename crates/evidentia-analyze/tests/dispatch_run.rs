//! Integration coverage for the dispatcher (C4): ingest through the store,
//! dispatch with a scripted provider, and confirm caching and skip
//! behavior without a second LLM call.

use evidentia_analyze::Dispatcher;
use evidentia_core::{CaseType, ChainAction};
use evidentia_llm::testing::FakeProvider;
use evidentia_llm::LlmError;
use evidentia_store::{ingest_file, EvidenceStore};
use std::sync::Arc;
use tempfile::TempDir;

fn document_json() -> serde_json::Value {
    serde_json::json!({
        "summary": "a memo about the Q3 numbers",
        "entities": [],
        "document_type": "memo",
        "sentiment": "neutral",
        "legal_significance": "low",
        "risk_flags": [],
        "confidence_overall": 0.8
    })
}

#[tokio::test]
async fn dispatch_analyzes_documents_caches_on_rerun_and_skips_video() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(EvidenceStore::new(dir.path()));

    let doc = ingest_file(&store, b"quarterly memo text", "/a/memo.txt", "memo.txt", None, "tester").unwrap();
    store.associate(&doc.evidence_id, "case-1", "tester").unwrap();

    let video = ingest_file(&store, &[0u8; 64], "/a/clip.mp4", "clip.mp4", Some("video/mp4"), "tester").unwrap();
    store.associate(&video.evidence_id, "case-1", "tester").unwrap();

    let provider = Arc::new(FakeProvider::new().then_respond(document_json()));
    let dispatcher = Dispatcher::new(store.clone(), provider, CaseType::Generic, 4);

    let report = dispatcher.run_case("case-1", "tester").await.unwrap();
    assert_eq!(report.analyzed_count(), 1);
    assert_eq!(report.skipped_count(), 1);

    let analysis = store.get_analysis(&doc.evidence_id).unwrap().unwrap();
    assert!(!analysis.fingerprint.is_empty());

    // Rerunning with a provider that would error if called proves the
    // fingerprint cache hit short-circuits the LLM call entirely.
    let exhausted_provider = Arc::new(FakeProvider::new());
    let dispatcher = Dispatcher::new(store.clone(), exhausted_provider, CaseType::Generic, 4);
    let second_report = dispatcher.run_case("case-1", "tester").await.unwrap();
    assert_eq!(second_report.cached_count(), 1);
    assert_eq!(second_report.skipped_count(), 1);
}

#[tokio::test]
async fn provider_refusal_appends_failed_analysis_chain_event() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(EvidenceStore::new(dir.path()));

    let doc = ingest_file(&store, b"a memo that gets refused", "/a/memo.txt", "memo.txt", None, "tester").unwrap();
    store.associate(&doc.evidence_id, "case-1", "tester").unwrap();

    let provider = Arc::new(
        FakeProvider::new().fail_times(1, LlmError::ProviderRefusal("content policy".to_string())),
    );
    let dispatcher = Dispatcher::new(store.clone(), provider, CaseType::Generic, 4);

    let report = dispatcher.run_case("case-1", "tester").await.unwrap();
    assert_eq!(report.failed_count(), 1);

    // The report is a convenience view, never a second source of truth: the
    // chain ledger must independently carry the failed_analysis event too,
    // even though the failure happened while computing the payload, before
    // any persistence was attempted.
    let chain = store.chain(&doc.evidence_id).unwrap();
    assert!(chain.iter().any(|e| e.action == ChainAction::FailedAnalysis));
    assert!(store.get_analysis(&doc.evidence_id).unwrap().is_none());
}
