// ============================================================
// Layer 2 - Predictor
// ============================================================
// Loads a pipeline's artifacts once and answers single
// predictions against them:
//
//   raw input → transformer → classifier → argmax → label
//
// The Predictor is immutable after load. It is Send + Sync, so
// the HTTP layer shares one instance across requests through
// an Arc with no locking.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data::{features::FeatureTransformer, label_encoder::LabelEncoder};
use crate::domain::error::PredictError;
use crate::domain::example::RawFeature;
use crate::domain::pipeline::{PipelineKind, PipelineSpec};
use crate::infra::artifacts::ArtifactStore;
use crate::ml::inferencer::Inferencer;

/// What to do with words the vectorizer never saw in training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OovPolicy {
    /// Drop them; they contribute nothing to the vector
    #[default]
    Ignore,
    /// Fail the request and name them
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label:       String,
    pub class_index: usize,
    pub confidence:  f32,
}

pub struct Predictor {
    spec:        PipelineSpec,
    encoder:     LabelEncoder,
    transformer: FeatureTransformer,
    inferencer:  Inferencer,
    oov:         OovPolicy,
}

impl Predictor {
    /// Load and cross-check the artifacts of `kind` from `store`.
    pub fn load(store: &ArtifactStore, kind: PipelineKind, oov: OovPolicy) -> Result<Self> {
        let artifacts = store.load()?;
        if artifacts.manifest.pipeline != kind {
            bail!(
                "Artifacts in '{}' belong to the {} pipeline, not {}",
                store.dir().display(),
                artifacts.manifest.pipeline,
                kind
            );
        }

        let inferencer = Inferencer::from_model(artifacts.model);
        tracing::info!(
            "{} predictor ready: {} features → {} classes (oov policy: {:?})",
            kind,
            inferencer.input_dim(),
            inferencer.num_classes(),
            oov
        );

        Ok(Self {
            spec: kind.spec(),
            encoder: artifacts.encoder,
            transformer: artifacts.transformer,
            inferencer,
            oov,
        })
    }

    /// Shorthand for loading from an artifact directory.
    pub fn from_dir(dir: impl AsRef<Path>, kind: PipelineKind, oov: OovPolicy) -> Result<Self> {
        let store = ArtifactStore::for_pipeline(dir.as_ref(), kind);
        Self::load(&store, kind, oov)
    }

    pub fn spec(&self) -> &PipelineSpec {
        &self.spec
    }

    pub fn classes(&self) -> &[String] {
        self.encoder.classes()
    }

    pub fn predict(&self, raw: &RawFeature) -> Result<Prediction, PredictError> {
        let vectorized = self.transformer.transform(raw)?;

        if !vectorized.unknown_terms.is_empty() {
            match self.oov {
                OovPolicy::Reject => {
                    return Err(PredictError::UnknownTerms(vectorized.unknown_terms));
                }
                OovPolicy::Ignore => tracing::debug!(
                    "Ignoring {} unknown term(s)",
                    vectorized.unknown_terms.len()
                ),
            }
        }

        let (class_index, confidence) = self.inferencer.predict(&vectorized.features)?;
        let label = self
            .encoder
            .decode(class_index)
            .ok_or(PredictError::UnknownClass(class_index))?
            .to_string();

        tracing::debug!("Predicted '{}' ({:.3})", label, confidence);
        Ok(Prediction { label, class_index, confidence })
    }
}
