//! Covers §8 scenario S4: a case whose evidence was never analyzed (e.g.
//! every analyzer call was a provider refusal) has no per-item analysis
//! record, so the assembler refuses the package rather than shipping a
//! partial one.

use evidentia_core::{ChainAction, ChainEvent, FileMetadata};
use evidentia_package::assemble_package;
use evidentia_schema::CorrelationAnalysis;
use evidentia_schema::CaseSummary;
use evidentia_store::EvidenceStore;
use tempfile::TempDir;

#[test]
fn evidence_with_no_analysis_record_refuses_the_package() {
    let dir = TempDir::new().unwrap();
    let store = EvidenceStore::new(dir.path());

    let id = store.put_raw(b"unanalyzable", "bin").unwrap();
    let metadata = FileMetadata {
        path: "/x.bin".to_string(),
        filename: "x.bin".to_string(),
        size_bytes: 12,
        mime_type: None,
        extension: Some("bin".to_string()),
        created_at: None,
        modified_at: None,
        sha256: id.as_hex().to_string(),
    };
    store.put_metadata(&id, &metadata).unwrap();
    store.associate(&id, "case-1", "tester").unwrap();
    store
        .append_event(
            &id,
            ChainEvent::new(id.clone(), ChainAction::FailedAnalysis, "tester", "provider refusal"),
        )
        .unwrap();

    let correlation = CorrelationAnalysis::empty("case-1");
    let summary = CaseSummary::no_evidence("case-1");
    let result = assemble_package(&store, "case-1", &correlation, &summary);

    assert!(result.is_err());
    assert!(!store.layout().package_dir("case-1").exists());
}
