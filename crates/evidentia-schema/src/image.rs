//! `ImageAnalysis` — the vision LLM's structured read of an image or a
//! rasterized PDF page set (spec §3, §4.7).

use crate::document::RiskFlag;
use crate::validate::{check_confidence, check_non_empty, SchemaError, Validate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema")]
use schemars::JsonSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum PotentialEvidenceValue {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ImageAnalysis {
    pub summary: String,
    pub detected_objects: Vec<String>,
    /// OCR text. For rasterized PDFs, per-page OCR is concatenated with a
    /// page-separator marker (spec §4.7).
    pub detected_text: String,
    pub scene_description: String,
    pub potential_evidence_value: PotentialEvidenceValue,
    pub analysis_confidence: f32,
    pub risk_flags: Vec<RiskFlag>,
}

/// The separator inserted between concatenated per-page OCR text when a
/// PDF is rasterized page-by-page (spec §4.7).
pub const PAGE_SEPARATOR: &str = "\n\n----- page break -----\n\n";

impl Validate for ImageAnalysis {
    fn validate(&self) -> Result<(), SchemaError> {
        check_non_empty("summary", &self.summary)?;
        check_confidence("analysis_confidence", self.analysis_confidence)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ImageAnalysis {
        ImageAnalysis {
            summary: "A photo of a whiteboard".to_string(),
            detected_objects: vec!["whiteboard".to_string()],
            detected_text: "Q3 targets".to_string(),
            scene_description: "office".to_string(),
            potential_evidence_value: PotentialEvidenceValue::Medium,
            analysis_confidence: 0.6,
            risk_flags: vec![],
        }
    }

    #[test]
    fn valid_image_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn out_of_range_confidence_fails() {
        let mut i = valid();
        i.analysis_confidence = -0.1;
        assert!(i.validate().is_err());
    }
}
