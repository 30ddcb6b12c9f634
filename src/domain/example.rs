// ============================================================
// Layer 3 - Labeled Example Domain Types
// ============================================================
// One row of a training dataset, and the raw input a caller
// sends to the predictor. Both pipelines share these types:
//
//   emotion pipeline: RawFeature::Text("I feel great today")
//   stress pipeline:  RawFeature::Scalar(72.0)

use serde::{Deserialize, Serialize};

/// The shape of the single raw feature column a pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Free-form text, vectorized with TF-IDF
    Text,
    /// One numeric measurement, used as a length-1 vector
    Scalar,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureKind::Text => write!(f, "text"),
            FeatureKind::Scalar => write!(f, "scalar"),
        }
    }
}

/// A raw, untransformed feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawFeature {
    Text(String),
    Scalar(f32),
}

impl RawFeature {
    pub fn kind(&self) -> FeatureKind {
        match self {
            RawFeature::Text(_) => FeatureKind::Text,
            RawFeature::Scalar(_) => FeatureKind::Scalar,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawFeature::Text(t) => Some(t),
            RawFeature::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            RawFeature::Scalar(v) => Some(*v),
            RawFeature::Text(_) => None,
        }
    }
}

/// One dataset row: a raw feature plus its categorical target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub feature: RawFeature,
    pub label:   String,
}

impl LabeledExample {
    pub fn new(feature: RawFeature, label: impl Into<String>) -> Self {
        Self { feature, label: label.into() }
    }

    pub fn text(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(RawFeature::Text(text.into()), label)
    }

    pub fn scalar(value: f32, label: impl Into<String>) -> Self {
        Self::new(RawFeature::Scalar(value), label)
    }
}
