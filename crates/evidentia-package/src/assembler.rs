//! The package assembler (C11, spec §4.10): copies validated artifacts
//! into a case's `package/` directory, refusing outright if any
//! referenced artifact fails schema validation (invariant 3).

use crate::catalog::build_catalog;
use crate::error::{PackageError, PackageResult};
use evidentia_schema::validate::Validate;
use evidentia_schema::{CaseSummary, CorrelationAnalysis, UnifiedAnalysis};
use evidentia_store::EvidenceStore;
use std::path::PathBuf;

/// Assembles `cases/<case_id>/package/` from already-produced artifacts.
///
/// Every analysis referenced by the case manifest, the correlation
/// record, and the case summary is validated before anything is written.
/// The first validation failure aborts the whole assembly — a package is
/// either fully built from known-good artifacts or not built at all.
pub fn assemble_package(
    store: &EvidenceStore,
    case_id: &str,
    correlation: &CorrelationAnalysis,
    summary: &CaseSummary,
) -> PackageResult<PathBuf> {
    correlation
        .validate()
        .map_err(|e| PackageError::InvalidArtifact {
            artifact: "correlation.v1.json".to_string(),
            reason: e.to_string(),
        })
        .inspect_err(|e| tracing::warn!(case_id, %e, "refusing to assemble package"))?;
    summary
        .validate()
        .map_err(|e| PackageError::InvalidArtifact {
            artifact: "summary.v1.json".to_string(),
            reason: e.to_string(),
        })
        .inspect_err(|e| tracing::warn!(case_id, %e, "refusing to assemble package"))?;

    let evidence_ids = store.list_case(case_id)?;
    let mut analyses: Vec<(String, UnifiedAnalysis)> = Vec::with_capacity(evidence_ids.len());
    for id in &evidence_ids {
        let analysis = store
            .get_analysis(id)?
            .ok_or_else(|| PackageError::MissingAnalysis(id.as_hex().to_string()))
            .inspect_err(|e| tracing::warn!(case_id, evidence_id = %id, %e, "refusing to assemble package"))?;
        analysis.validate().map_err(|e| PackageError::InvalidArtifact {
            artifact: format!("derived/sha256={}/analysis.v1.json", id.as_hex()),
            reason: e.to_string(),
        })?;
        analyses.push((id.as_hex().to_string(), analysis));
    }

    let only_analyses: Vec<UnifiedAnalysis> = analyses.iter().map(|(_, a)| a.clone()).collect();
    let catalog = build_catalog(&only_analyses)?;

    let package_dir = store.layout().package_dir(case_id);
    std::fs::create_dir_all(&package_dir)?;

    for (hex, analysis) in &analyses {
        let path = package_dir.join(format!("{hex}.analysis.v1.json"));
        evidentia_store::write_json_atomic(&path, analysis)?;
    }
    evidentia_store::write_json_atomic(&package_dir.join("correlation.v1.json"), correlation)?;
    evidentia_store::write_json_atomic(&package_dir.join("summary.v1.json"), summary)?;
    evidentia_store::write_json_atomic(&package_dir.join("catalog.json"), &catalog)?;

    tracing::info!(case_id, item_count = analyses.len(), "assembled case package");
    Ok(package_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_core::{ChainAction, ChainEvent, EvidenceType, FileMetadata};
    use evidentia_schema::document::{DocumentAnalysis, LegalSignificance, Sentiment};
    use evidentia_schema::AnalysisPayload;
    use tempfile::TempDir;

    fn put_one_analyzed_item(store: &EvidenceStore, case_id: &str) -> evidentia_core::EvidenceId {
        let id = store.put_raw(b"hello world", "txt").unwrap();
        let metadata = FileMetadata {
            path: "/x.txt".to_string(),
            filename: "x.txt".to_string(),
            size_bytes: 11,
            mime_type: Some("text/plain".to_string()),
            extension: Some("txt".to_string()),
            created_at: None,
            modified_at: None,
            sha256: id.as_hex().to_string(),
        };
        store.put_metadata(&id, &metadata).unwrap();
        store.associate(&id, case_id, "tester").unwrap();
        let analysis = UnifiedAnalysis::new(
            EvidenceType::Document,
            "model-x",
            "fp",
            metadata,
            AnalysisPayload::Document(DocumentAnalysis {
                summary: "a memo".to_string(),
                entities: vec![],
                document_type: "memo".to_string(),
                sentiment: Sentiment::Neutral,
                legal_significance: LegalSignificance::Low,
                risk_flags: vec![],
                confidence_overall: 0.8,
            }),
        );
        store.put_analysis(&id, &analysis, "tester").unwrap();
        store
            .append_event(&id, ChainEvent::new(id.clone(), ChainAction::Analyze, "tester", "ok"))
            .unwrap();
        id
    }

    #[test]
    fn assembles_a_package_with_one_item() {
        let dir = TempDir::new().unwrap();
        let store = EvidenceStore::new(dir.path());
        put_one_analyzed_item(&store, "case-1");

        let correlation = CorrelationAnalysis::empty("case-1");
        let summary = CaseSummary::no_evidence("case-1");
        let package_dir = assemble_package(&store, "case-1", &correlation, &summary).unwrap();

        assert!(package_dir.join("correlation.v1.json").exists());
        assert!(package_dir.join("summary.v1.json").exists());
        assert!(package_dir.join("catalog.json").exists());
        let entries: Vec<_> = std::fs::read_dir(&package_dir).unwrap().collect();
        assert!(entries.iter().any(|e| e
            .as_ref()
            .unwrap()
            .file_name()
            .to_string_lossy()
            .ends_with(".analysis.v1.json")));
    }

    #[test]
    fn invalid_summary_refuses_to_assemble() {
        let dir = TempDir::new().unwrap();
        let store = EvidenceStore::new(dir.path());
        put_one_analyzed_item(&store, "case-1");

        let correlation = CorrelationAnalysis::empty("case-1");
        let mut summary = CaseSummary::no_evidence("case-1");
        summary.enhancement_applied = true; // disagrees with overall_assessment.enhancement

        let result = assemble_package(&store, "case-1", &correlation, &summary);
        assert!(matches!(result, Err(PackageError::InvalidArtifact { .. })));
        assert!(!store.layout().package_dir("case-1").exists());
    }
}
