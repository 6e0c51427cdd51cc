//! `CaseManifest` — the ordered list of evidence ids associated with a case
//! (spec §4.1 on-disk layout: `cases/<case_id>/manifest.json`).

use evidentia_core::EvidenceId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseManifest {
    pub evidence_ids: Vec<EvidenceId>,
}

impl CaseManifest {
    /// Adds `id` if not already present, preserving insertion order.
    pub fn add(&mut self, id: EvidenceId) {
        if !self.evidence_ids.contains(&id) {
            self.evidence_ids.push(id);
        }
    }

    pub fn contains(&self, id: &EvidenceId) -> bool {
        self.evidence_ids.contains(id)
    }
}
