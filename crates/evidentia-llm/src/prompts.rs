//! Versioned prompt templates: each analyzer and correlation prompt is
//! named and versioned so a fingerprint (see
//! [`crate::fingerprint`]) changes whenever the wording that produced a
//! cached analysis changes, and a template's content hash can be recorded
//! alongside the analysis it produced for audit purposes.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// A single named, versioned prompt with `{{var}}` substitution.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub version: u32,
    body: String,
}

impl PromptTemplate {
    pub fn new(name: &'static str, version: u32, body: impl Into<String>) -> Self {
        Self {
            name,
            version,
            body: body.into(),
        }
    }

    /// Substitutes each `{{key}}` placeholder with its value. Unknown
    /// placeholders are left untouched so a missing variable is visible in
    /// the rendered prompt rather than silently dropped.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut rendered = self.body.clone();
        for (key, value) in vars {
            rendered = rendered.replace(&format!("{{{{{key}}}}}"), value);
        }
        rendered
    }

    /// A stable hex digest of the template's unrendered body, used as the
    /// `prompt_version` input to [`crate::fingerprint::Fingerprint`].
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.body.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

/// A lookup table of the templates an analyzer or correlation pass draws
/// from, keyed by template name.
#[derive(Debug, Default)]
pub struct PromptRegistry {
    templates: HashMap<&'static str, PromptTemplate>,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, template: PromptTemplate) -> &mut Self {
        self.templates.insert(template.name, template);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.get(name)
    }
}
