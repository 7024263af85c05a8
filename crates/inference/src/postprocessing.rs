use crate::backend::RawScore;
use serde::{Deserialize, Serialize};

/// Scores strictly above this are classified as defective.
pub const DEFECT_THRESHOLD: RawScore = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Good,
    Defective,
}

/// Human-readable names for the two labels, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelNames {
    pub good: String,
    pub defective: String,
}

impl LabelNames {
    pub fn name(&self, label: Label) -> &str {
        match label {
            Label::Good => &self.good,
            Label::Defective => &self.defective,
        }
    }
}

impl Default for LabelNames {
    fn default() -> Self {
        Self {
            good: "biji bagus".to_string(),
            defective: "biji rusak".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub label: Label,
    pub confidence: f32,
    pub raw_score: RawScore,
}

impl PredictionResult {
    pub fn to_payload(&self, labels: &LabelNames) -> PredictionPayload {
        PredictionPayload {
            prediction: labels.name(self.label).to_string(),
            confidence: format!("{:.4}", self.confidence),
            raw_output: self.raw_score,
        }
    }
}

/// JSON body of a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub prediction: String,
    pub confidence: String,
    pub raw_output: f32,
}

/// Map a raw sigmoid score onto a label and the confidence in that label.
pub fn format(score: RawScore) -> PredictionResult {
    let label = if score > DEFECT_THRESHOLD {
        Label::Defective
    } else {
        Label::Good
    };

    let confidence = match label {
        Label::Defective => score,
        Label::Good => 1.0 - score,
    };

    PredictionResult {
        label,
        confidence,
        raw_score: score,
    }
}
