//! Typed judgment request/response contracts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Classification of a clip's primary content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Talking head, interview, narration to camera.
    Dialogue,
    /// Supplementary footage without meaningful speech.
    Broll,
}

impl Classification {
    pub fn is_dialogue(&self) -> bool {
        matches!(self, Classification::Dialogue)
    }
}

/// Result of classifying a clip.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationResult {
    pub classification: Classification,
    pub reasoning: String,
}

/// Decision on optimal cut points for a clip.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CutPointDecision {
    pub source_in_seconds: f64,
    pub source_out_seconds: f64,
    pub reasoning: String,
}

impl CutPointDecision {
    pub fn duration(&self) -> f64 {
        self.source_out_seconds - self.source_in_seconds
    }
}

/// Decision on whether to include or skip a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QualityDecision {
    Include,
    Skip,
}

/// Result from the quality filter.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QualityVerdict {
    pub decision: QualityDecision,
    /// Confidence in the decision (0.0 to 1.0).
    pub confidence: f64,
    pub reasoning: String,
}

impl QualityVerdict {
    /// Verdict used when quality filtering is disabled.
    pub fn always_include() -> Self {
        Self {
            decision: QualityDecision::Include,
            confidence: 1.0,
            reasoning: "quality filtering disabled".to_string(),
        }
    }
}
