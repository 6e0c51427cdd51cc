//! `Entity` — a single named thing extracted from an evidence item (§3).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

/// The closed set of entity kinds the analyzers may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum EntityType {
    Person,
    Organization,
    Date,
    Location,
    LegalTerm,
    TextInImage,
    Other,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Organization => "organization",
            EntityType::Date => "date",
            EntityType::Location => "location",
            EntityType::LegalTerm => "legal_term",
            EntityType::TextInImage => "text_in_image",
            EntityType::Other => "other",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named entity extracted by an analyzer from a single evidence item.
///
/// `quoted_text` and `relationship` are optional and drive downstream
/// correlation analytics (spec §3); they are not required for an entity to
/// be otherwise valid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Entity {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub entity_type: EntityType,
    pub confidence: f32,
    pub context: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub quoted_text: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub associated_event: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub relationship: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub role: Option<String>,
}

impl Entity {
    pub fn is_confidence_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}
