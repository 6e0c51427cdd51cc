//! `EvidenceStore` — the content-addressed store (C1, spec §4.1).

use crate::atomic::{read_json_opt, write_atomic, write_json_atomic};
use crate::error::{StoreError, StoreResult};
use crate::layout::Layout;
use crate::lock::CaseLocks;
use crate::manifest::CaseManifest;
use evidentia_core::{ChainAction, ChainEvent, EvidenceId, FileMetadata};
use evidentia_schema::validate::Validate;
use evidentia_schema::UnifiedAnalysis;
use std::path::PathBuf;

pub struct EvidenceStore {
    layout: Layout,
    locks: CaseLocks,
}

impl EvidenceStore {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: Layout::new(storage_root),
            locks: CaseLocks::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Streams `bytes` into the raw blob directory. No-ops if the blob
    /// already exists, so re-ingesting identical content is idempotent
    /// (spec §4.1 "Guarantees").
    pub fn put_raw(&self, bytes: &[u8], extension: &str) -> StoreResult<EvidenceId> {
        let id = EvidenceId::from_bytes(bytes);
        let path = self.layout.raw_file(&id, extension);
        if path.exists() {
            tracing::debug!(evidence_id = %id, "raw blob already present, ingest is a no-op");
        } else {
            write_atomic(&path, bytes)?;
            tracing::info!(evidence_id = %id, size_bytes = bytes.len(), "ingested raw blob");
        }
        Ok(id)
    }

    pub fn raw_exists(&self, id: &EvidenceId) -> bool {
        self.layout.raw_dir(id).exists()
    }

    /// Reads the raw bytes back, whatever extension they were written
    /// under (each raw directory holds exactly one `original.<ext>` file).
    /// Returns `Ok(None)` if the evidence has never been ingested.
    pub fn get_raw(&self, id: &EvidenceId) -> StoreResult<Option<Vec<u8>>> {
        let dir = self.layout.raw_dir(id);
        let mut entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match entries.next() {
            Some(entry) => Ok(Some(std::fs::read(entry?.path())?)),
            None => Ok(None),
        }
    }

    pub fn put_metadata(&self, id: &EvidenceId, metadata: &FileMetadata) -> StoreResult<()> {
        write_json_atomic(&self.layout.metadata_file(id), metadata)
    }

    pub fn get_metadata(&self, id: &EvidenceId) -> StoreResult<Option<FileMetadata>> {
        read_json_opt(&self.layout.metadata_file(id))
    }

    /// Adds `case_id` to the case manifest and appends a `case_associate`
    /// chain event. Fails if the evidence's raw blob is absent.
    pub fn associate(&self, id: &EvidenceId, case_id: &str, actor: &str) -> StoreResult<()> {
        if !self.raw_exists(id) {
            return Err(StoreError::UnknownEvidence(id.clone()));
        }
        self.locks.with_case_lock(case_id, || {
            let manifest_path = self.layout.manifest_file(case_id);
            let mut manifest: CaseManifest =
                read_json_opt(&manifest_path)?.unwrap_or_default();
            manifest.add(id.clone());
            write_json_atomic(&manifest_path, &manifest)?;
            Ok(())
        })?;
        tracing::info!(evidence_id = %id, case_id, "associated evidence with case");
        self.append_event(
            id,
            ChainEvent::new(
                id.clone(),
                ChainAction::CaseAssociate,
                actor,
                format!("associated with case {case_id}"),
            ),
        )
    }

    /// Reads a persisted analysis, re-validating it against its schema and
    /// confirming its raw blob still exists (spec §3, §7 "Integrity" —
    /// invariant 1: every derived record has a corresponding raw blob). A
    /// record that fails either check halts the caller rather than flowing
    /// unvalidated into correlation/summarization.
    pub fn get_analysis(&self, id: &EvidenceId) -> StoreResult<Option<UnifiedAnalysis>> {
        let analysis: Option<UnifiedAnalysis> = read_json_opt(&self.layout.analysis_file(id))?;
        let Some(analysis) = analysis else {
            return Ok(None);
        };
        if !self.raw_exists(id) {
            return Err(StoreError::OrphanDerived(id.clone()));
        }
        analysis
            .validate()
            .map_err(|source| StoreError::Integrity { id: id.clone(), source })?;
        Ok(Some(analysis))
    }

    /// Writes a new analysis record atomically and appends an `analyze`
    /// chain event (or `reanalyze` when a prior record already existed).
    pub fn put_analysis(
        &self,
        id: &EvidenceId,
        analysis: &UnifiedAnalysis,
        actor: &str,
    ) -> StoreResult<()> {
        let had_prior = self.get_analysis(id)?.is_some();
        write_json_atomic(&self.layout.analysis_file(id), analysis)?;
        let action = if had_prior {
            ChainAction::Reanalyze
        } else {
            ChainAction::Analyze
        };
        tracing::info!(evidence_id = %id, action = action.as_str(), "analysis persisted");
        self.append_event(
            id,
            ChainEvent::new(id.clone(), action, actor, "analysis written"),
        )
    }

    pub fn append_event(&self, id: &EvidenceId, event: ChainEvent) -> StoreResult<()> {
        let path = self.layout.chain_file(id);
        let mut events: Vec<ChainEvent> = read_json_opt(&path)?.unwrap_or_default();
        events.push(event);
        write_json_atomic(&path, &events)
    }

    pub fn chain(&self, id: &EvidenceId) -> StoreResult<Vec<ChainEvent>> {
        Ok(read_json_opt(&self.layout.chain_file(id))?.unwrap_or_default())
    }

    pub fn list_case(&self, case_id: &str) -> StoreResult<Vec<EvidenceId>> {
        let manifest: CaseManifest = read_json_opt(&self.layout.manifest_file(case_id))?
            .ok_or_else(|| StoreError::UnknownCase(case_id.to_string()))?;
        Ok(manifest.evidence_ids)
    }

    /// Reads every analysis for a case, in manifest order, skipping items
    /// that were ingested but never analyzed (video/audio, or items still
    /// pending their first analyzer run).
    pub fn iter_case_analyses(&self, case_id: &str) -> StoreResult<Vec<UnifiedAnalysis>> {
        let ids = self.list_case(case_id)?;
        let mut analyses = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(analysis) = self.get_analysis(&id)? {
                analyses.push(analysis);
            }
        }
        Ok(analyses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidentia_core::EvidenceType;
    use evidentia_schema::{AnalysisPayload, DocumentAnalysis, LegalSignificance, Sentiment};
    use tempfile::TempDir;

    fn store() -> (TempDir, EvidenceStore) {
        let dir = TempDir::new().unwrap();
        let store = EvidenceStore::new(dir.path());
        (dir, store)
    }

    fn sample_analysis() -> UnifiedAnalysis {
        let metadata = FileMetadata {
            path: "/tmp/x.txt".to_string(),
            filename: "x.txt".to_string(),
            size_bytes: 4,
            mime_type: Some("text/plain".to_string()),
            extension: Some("txt".to_string()),
            created_at: None,
            modified_at: None,
            sha256: EvidenceId::from_bytes(b"hi").as_hex().to_string(),
        };
        UnifiedAnalysis::new(
            EvidenceType::Document,
            "model-x",
            "fp-1",
            metadata,
            AnalysisPayload::Document(DocumentAnalysis {
                summary: "s".to_string(),
                entities: vec![],
                document_type: "memo".to_string(),
                sentiment: Sentiment::Neutral,
                legal_significance: LegalSignificance::Low,
                risk_flags: vec![],
                confidence_overall: 0.5,
            }),
        )
    }

    #[test]
    fn put_raw_is_idempotent() {
        let (_dir, store) = store();
        let a = store.put_raw(b"hello world", "txt").unwrap();
        let b = store.put_raw(b"hello world", "txt").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn get_raw_roundtrips_whatever_extension_was_written() {
        let (_dir, store) = store();
        let id = store.put_raw(b"hello", "eml").unwrap();
        assert_eq!(store.get_raw(&id).unwrap(), Some(b"hello".to_vec()));
    }

    #[test]
    fn get_raw_is_none_for_unknown_evidence() {
        let (_dir, store) = store();
        let id = EvidenceId::from_bytes(b"never written");
        assert_eq!(store.get_raw(&id).unwrap(), None);
    }

    #[test]
    fn associate_requires_existing_raw() {
        let (_dir, store) = store();
        let id = EvidenceId::from_bytes(b"nope");
        assert!(store.associate(&id, "case-1", "tester").is_err());
    }

    #[test]
    fn associate_then_list_case_roundtrips() {
        let (_dir, store) = store();
        let id = store.put_raw(b"hello", "txt").unwrap();
        store.associate(&id, "case-1", "tester").unwrap();
        assert_eq!(store.list_case("case-1").unwrap(), vec![id.clone()]);
        let chain = store.chain(&id).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].action, ChainAction::CaseAssociate);
    }

    #[test]
    fn put_analysis_then_get_roundtrips() {
        let (_dir, store) = store();
        let id = store.put_raw(b"hello", "txt").unwrap();
        let analysis = sample_analysis();
        store.put_analysis(&id, &analysis, "tester").unwrap();
        let fetched = store.get_analysis(&id).unwrap().unwrap();
        assert_eq!(fetched, analysis);
        let chain = store.chain(&id).unwrap();
        assert_eq!(chain[0].action, ChainAction::Analyze);
    }

    #[test]
    fn second_analysis_appends_reanalyze_event() {
        let (_dir, store) = store();
        let id = store.put_raw(b"hello", "txt").unwrap();
        let analysis = sample_analysis();
        store.put_analysis(&id, &analysis, "tester").unwrap();
        store.put_analysis(&id, &analysis, "tester").unwrap();
        let chain = store.chain(&id).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[1].action, ChainAction::Reanalyze);
    }

    #[test]
    fn iter_case_analyses_skips_unanalyzed_items() {
        let (_dir, store) = store();
        let analyzed = store.put_raw(b"one", "txt").unwrap();
        let unanalyzed = store.put_raw(b"two", "txt").unwrap();
        store.associate(&analyzed, "case-1", "tester").unwrap();
        store.associate(&unanalyzed, "case-1", "tester").unwrap();
        store
            .put_analysis(&analyzed, &sample_analysis(), "tester")
            .unwrap();
        let analyses = store.iter_case_analyses("case-1").unwrap();
        assert_eq!(analyses.len(), 1);
    }

    #[test]
    fn unknown_case_is_an_error() {
        let (_dir, store) = store();
        assert!(store.list_case("nope").is_err());
    }

    #[test]
    fn get_analysis_rejects_an_out_of_range_confidence_on_disk() {
        let (_dir, store) = store();
        let id = store.put_raw(b"hello", "txt").unwrap();
        let mut analysis = sample_analysis();
        if let AnalysisPayload::Document(doc) = &mut analysis.payload {
            doc.confidence_overall = 5.0;
        }
        // Write directly, bypassing `put_analysis`'s own validate-before-write
        // path, to simulate a record that was corrupted or hand-edited after
        // it was originally written valid.
        write_json_atomic(&store.layout.analysis_file(&id), &analysis).unwrap();

        let result = store.get_analysis(&id);
        assert!(matches!(result, Err(StoreError::Integrity { .. })));
    }

    #[test]
    fn get_analysis_rejects_a_derived_record_with_no_raw_blob() {
        let (_dir, store) = store();
        let id = store.put_raw(b"hello", "txt").unwrap();
        let analysis = sample_analysis();
        write_json_atomic(&store.layout.analysis_file(&id), &analysis).unwrap();

        // Remove the raw blob directory out from under the derived record.
        std::fs::remove_dir_all(store.layout.raw_dir(&id)).unwrap();

        let result = store.get_analysis(&id);
        assert!(matches!(result, Err(StoreError::OrphanDerived(_))));
    }
}
