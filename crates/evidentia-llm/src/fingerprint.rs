//! Call fingerprinting (§4.4): a stable key identifying "this exact
//! analysis would be performed", used both to decide whether a cached
//! result can be reused and to coalesce concurrent identical requests in
//! [`crate::singleflight`].

use sha2::{Digest, Sha256};
use std::fmt;

/// `hash(evidence_id || analyzer_version || prompt_version || model_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(
        evidence_id: &str,
        analyzer_version: u32,
        prompt_version: &str,
        model_id: &str,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(evidence_id.as_bytes());
        hasher.update(b"|");
        hasher.update(analyzer_version.to_le_bytes());
        hasher.update(b"|");
        hasher.update(prompt_version.as_bytes());
        hasher.update(b"|");
        hasher.update(model_id.as_bytes());
        let digest = hasher.finalize();
        Self(digest.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_fingerprint_identically() {
        let a = Fingerprint::compute("ev1", 1, "p1", "model-a");
        let b = Fingerprint::compute("ev1", 1, "p1", "model-a");
        assert_eq!(a, b);
    }

    #[test]
    fn any_differing_input_changes_the_fingerprint() {
        let base = Fingerprint::compute("ev1", 1, "p1", "model-a");
        assert_ne!(base, Fingerprint::compute("ev2", 1, "p1", "model-a"));
        assert_ne!(base, Fingerprint::compute("ev1", 2, "p1", "model-a"));
        assert_ne!(base, Fingerprint::compute("ev1", 1, "p2", "model-a"));
        assert_ne!(base, Fingerprint::compute("ev1", 1, "p1", "model-b"));
    }
}
