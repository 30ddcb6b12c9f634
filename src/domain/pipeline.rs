// ============================================================
// Layer 3 - Pipeline Definitions
// ============================================================
// Both classifiers follow the same train/persist/serve shape.
// Everything that differs between them lives in a PipelineSpec:
//
//                    emotion              stress
//   feature column   message              heart_rate
//   target column    emotion              anxiety_level
//   feature kind     text (TF-IDF)        scalar
//   hidden layers    32 -> 16             16 -> 8
//   epochs           30                   50
//   route            /detect_emotion      /predict_stress
//   default port     5000                 5001

use serde::{Deserialize, Serialize};

use crate::domain::example::FeatureKind;

/// The two pipelines this crate knows how to train and serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Emotion,
    Stress,
}

impl PipelineKind {
    pub fn spec(self) -> PipelineSpec {
        match self {
            PipelineKind::Emotion => PipelineSpec::emotion(),
            PipelineKind::Stress => PipelineSpec::stress(),
        }
    }
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineKind::Emotion => write!(f, "emotion"),
            PipelineKind::Stress => write!(f, "stress"),
        }
    }
}

/// Fixed, well-known artifact file names for one pipeline.
/// Trainer and Predictor agree on these out-of-band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    pub label_encoder: &'static str,
    /// Present for the text pipeline (vectorizer) and for a scaled
    /// scalar pipeline (scaler); never used for the raw identity transform
    pub transformer:   &'static str,
    /// File stem of the classifier weights (the recorder adds `.mpk`)
    pub model:         &'static str,
}

impl ArtifactNames {
    pub fn manifest_file(&self) -> String {
        format!("{}.json", self.model)
    }

    pub fn metrics_file(&self) -> String {
        format!("{}_metrics.csv", self.model)
    }
}

/// Static description of one pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSpec {
    pub kind:           PipelineKind,
    pub feature_kind:   FeatureKind,
    pub feature_column: &'static str,
    pub target_column:  &'static str,
    pub hidden_sizes:   &'static [usize],
    pub epochs:         usize,
    pub route:          &'static str,
    /// Request JSON field carrying the raw input
    pub input_field:    &'static str,
    /// Response JSON field carrying the decoded label
    pub output_field:   &'static str,
    pub default_port:   u16,
    pub artifacts:      ArtifactNames,
}

impl PipelineSpec {
    pub fn emotion() -> Self {
        Self {
            kind:           PipelineKind::Emotion,
            feature_kind:   FeatureKind::Text,
            feature_column: "message",
            target_column:  "emotion",
            hidden_sizes:   &[32, 16],
            epochs:         30,
            route:          "/detect_emotion",
            input_field:    "message",
            output_field:   "emotion",
            default_port:   5000,
            artifacts: ArtifactNames {
                label_encoder: "label_encoder.json",
                transformer:   "vectorizer.json",
                model:         "emotion_detector",
            },
        }
    }

    pub fn stress() -> Self {
        Self {
            kind:           PipelineKind::Stress,
            feature_kind:   FeatureKind::Scalar,
            feature_column: "heart_rate",
            target_column:  "anxiety_level",
            hidden_sizes:   &[16, 8],
            epochs:         50,
            route:          "/predict_stress",
            input_field:    "heart_rate",
            output_field:   "anxiety_level",
            default_port:   5001,
            artifacts: ArtifactNames {
                label_encoder: "stress_label_encoder.json",
                transformer:   "stress_scaler.json",
                model:         "stress_predictor",
            },
        }
    }
}
