//! Builds the case package's evidence catalog (spec §4.10): one entry per
//! analyzed item, written alongside the package's other artifacts.

use crate::error::PackageResult;
use evidentia_schema::{EvidenceCatalogEntry, UnifiedAnalysis};

/// Builds a catalog entry for every analysis, in the order given.
pub fn build_catalog(analyses: &[UnifiedAnalysis]) -> PackageResult<Vec<EvidenceCatalogEntry>> {
    analyses
        .iter()
        .map(|a| EvidenceCatalogEntry::from_analysis(a).map_err(Into::into))
        .collect()
}
