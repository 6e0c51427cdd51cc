//! Path helpers for the content-addressed on-disk layout (spec §4.1).
//!
//! ```text
//! <base>/
//!   raw/sha256=<id>/original.<ext>
//!   derived/sha256=<id>/
//!     metadata.json
//!     analysis.v1.json
//!     chain_of_custody.json
//!     exif.json / phash.txt
//!   cases/<case_id>/
//!     manifest.json
//!     correlation.v1.json
//!     summary.v1.json
//!     package/
//! ```
//!
//! File names and directory shapes are part of the interface external
//! collaborators read directly, so they are collected here rather than
//! inlined at each call site.

use evidentia_core::EvidenceId;
use std::path::{Path, PathBuf};

pub struct Layout {
    base: PathBuf,
}

impl Layout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn raw_dir(&self, id: &EvidenceId) -> PathBuf {
        self.base.join("raw").join(id.store_component())
    }

    pub fn raw_file(&self, id: &EvidenceId, extension: &str) -> PathBuf {
        let name = if extension.is_empty() {
            "original".to_string()
        } else {
            format!("original.{extension}")
        };
        self.raw_dir(id).join(name)
    }

    pub fn derived_dir(&self, id: &EvidenceId) -> PathBuf {
        self.base.join("derived").join(id.store_component())
    }

    pub fn metadata_file(&self, id: &EvidenceId) -> PathBuf {
        self.derived_dir(id).join("metadata.json")
    }

    pub fn analysis_file(&self, id: &EvidenceId) -> PathBuf {
        self.derived_dir(id).join("analysis.v1.json")
    }

    pub fn chain_file(&self, id: &EvidenceId) -> PathBuf {
        self.derived_dir(id).join("chain_of_custody.json")
    }

    pub fn exif_file(&self, id: &EvidenceId) -> PathBuf {
        self.derived_dir(id).join("exif.json")
    }

    pub fn phash_file(&self, id: &EvidenceId) -> PathBuf {
        self.derived_dir(id).join("phash.txt")
    }

    pub fn case_dir(&self, case_id: &str) -> PathBuf {
        self.base.join("cases").join(case_id)
    }

    pub fn manifest_file(&self, case_id: &str) -> PathBuf {
        self.case_dir(case_id).join("manifest.json")
    }

    pub fn correlation_file(&self, case_id: &str) -> PathBuf {
        self.case_dir(case_id).join("correlation.v1.json")
    }

    pub fn summary_file(&self, case_id: &str) -> PathBuf {
        self.case_dir(case_id).join("summary.v1.json")
    }

    pub fn package_dir(&self, case_id: &str) -> PathBuf {
        self.case_dir(case_id).join("package")
    }
}
