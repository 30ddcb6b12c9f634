// ============================================================
// Layer 4 - Feature Transformer
// ============================================================
// One fitted transform per pipeline, chosen by feature kind:
//
//   text    ->  Tfidf     (vocabulary-sized vector)
//   scalar  ->  Standard  (length 1, centered and scaled)
//   scalar  ->  Identity  (length 1, raw value, no artifact)
//
// The same transform runs at training and serving time, so a
// request vector lines up column for column with what the
// classifier saw during fitting.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::data::scaler::StandardScaler;
use crate::data::vectorizer::{TfidfVectorizer, Vectorized};
use crate::domain::error::PredictError;
use crate::domain::example::{FeatureKind, RawFeature};
use crate::domain::traits::Persistable;

/// How a scalar feature is prepared for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    /// Standardise with the training mean and deviation
    #[default]
    Standard,
    /// Feed the raw value through unchanged
    None,
}

/// Which transform a manifest was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformerKind {
    Tfidf,
    Standard,
    Identity,
}

impl TransformerKind {
    pub fn for_feature(kind: FeatureKind, scaling: Scaling) -> Self {
        match (kind, scaling) {
            (FeatureKind::Text, _)                 => TransformerKind::Tfidf,
            (FeatureKind::Scalar, Scaling::Standard) => TransformerKind::Standard,
            (FeatureKind::Scalar, Scaling::None)     => TransformerKind::Identity,
        }
    }

    pub fn feature_kind(self) -> FeatureKind {
        match self {
            TransformerKind::Tfidf => FeatureKind::Text,
            TransformerKind::Standard | TransformerKind::Identity => FeatureKind::Scalar,
        }
    }

    /// Whether this transform persists its own artifact file.
    pub fn has_artifact(self) -> bool {
        !matches!(self, TransformerKind::Identity)
    }
}

impl fmt::Display for TransformerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformerKind::Tfidf    => "tfidf",
            TransformerKind::Standard => "standard",
            TransformerKind::Identity => "identity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub enum FeatureTransformer {
    Tfidf(TfidfVectorizer),
    Standard(StandardScaler),
    Identity,
}

impl FeatureTransformer {
    /// Fit a transformer of `kind` over the training feature column.
    pub fn fit(kind: TransformerKind, features: &[RawFeature]) -> Result<Self> {
        match kind {
            TransformerKind::Tfidf => {
                let texts = features
                    .iter()
                    .map(|f| f.as_text().ok_or_else(|| wrong_column(kind, f)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(FeatureTransformer::Tfidf(TfidfVectorizer::fit(texts)?))
            }
            TransformerKind::Standard => {
                let values = features
                    .iter()
                    .map(|f| f.as_scalar().ok_or_else(|| wrong_column(kind, f)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(FeatureTransformer::Standard(StandardScaler::fit(&values)?))
            }
            TransformerKind::Identity => {
                if let Some(f) = features.iter().find(|f| f.as_scalar().is_none()) {
                    return Err(wrong_column(kind, f));
                }
                Ok(FeatureTransformer::Identity)
            }
        }
    }

    pub fn kind(&self) -> TransformerKind {
        match self {
            FeatureTransformer::Tfidf(_)    => TransformerKind::Tfidf,
            FeatureTransformer::Standard(_) => TransformerKind::Standard,
            FeatureTransformer::Identity    => TransformerKind::Identity,
        }
    }

    /// Length of every vector this transformer produces.
    pub fn dim(&self) -> usize {
        match self {
            FeatureTransformer::Tfidf(v) => v.dim(),
            FeatureTransformer::Standard(_) | FeatureTransformer::Identity => 1,
        }
    }

    pub fn transform(&self, raw: &RawFeature) -> Result<Vectorized, PredictError> {
        let expected = self.kind().feature_kind();
        let mismatch = || PredictError::WrongType {
            expected,
            found: raw.kind().to_string(),
        };

        match self {
            FeatureTransformer::Tfidf(v) => {
                let text = raw.as_text().ok_or_else(mismatch)?;
                v.transform(text)
                    .map_err(|e| PredictError::Inference(e.to_string()))
            }
            FeatureTransformer::Standard(s) => {
                let value = finite_scalar(raw).ok_or_else(mismatch)??;
                Ok(scalar_vector(s.transform(value)))
            }
            FeatureTransformer::Identity => {
                let value = finite_scalar(raw).ok_or_else(mismatch)??;
                Ok(scalar_vector(value))
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        match self {
            FeatureTransformer::Tfidf(v)    => v.save(path),
            FeatureTransformer::Standard(s) => s.save(path),
            FeatureTransformer::Identity    => Ok(()),
        }
    }

    pub fn load(kind: TransformerKind, path: &Path) -> Result<Self> {
        Ok(match kind {
            TransformerKind::Tfidf    => FeatureTransformer::Tfidf(TfidfVectorizer::load(path)?),
            TransformerKind::Standard => FeatureTransformer::Standard(StandardScaler::load(path)?),
            TransformerKind::Identity => FeatureTransformer::Identity,
        })
    }
}

/// `None` for a non-scalar input, `Some(Err)` for NaN or infinity.
fn finite_scalar(raw: &RawFeature) -> Option<Result<f32, PredictError>> {
    raw.as_scalar().map(|v| {
        if v.is_finite() {
            Ok(v)
        } else {
            Err(PredictError::NonFinite(v))
        }
    })
}

fn scalar_vector(value: f32) -> Vectorized {
    Vectorized {
        features:      vec![value],
        unknown_terms: Vec::new(),
    }
}

fn wrong_column(kind: TransformerKind, found: &RawFeature) -> anyhow::Error {
    anyhow::anyhow!(
        "A {} transformer needs {} features, got {}",
        kind,
        kind.feature_kind(),
        found.kind()
    )
}

/// Fail unless the loaded transformer matches what the manifest records.
pub fn ensure_kind(transformer: &FeatureTransformer, expected: TransformerKind) -> Result<()> {
    if transformer.kind() != expected {
        bail!(
            "Transformer kind '{}' does not match manifest kind '{}'",
            transformer.kind(),
            expected
        );
    }
    Ok(())
}
