// ============================================================
// Layer 4 - Classification Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec of samples
// into the two tensors a training step needs:
//
//   Input:  N samples, each with a feature vector of length D
//   Output: features [N, D] (Float), targets [N] (Int)
//
// Every sample coming out of one FeatureTransformer has the
// same length, so the flat buffer reshapes cleanly.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ClassificationSample;

// ─── ClassificationBatch ──────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ClassificationBatch<B: Backend> {
    /// Shape: [batch_size, feature_dim]
    pub features: Tensor<B, 2>,

    /// Class indices - shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── ClassificationBatcher ────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct ClassificationBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ClassificationBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ClassificationSample, ClassificationBatch<B>> for ClassificationBatcher<B> {
    fn batch(&self, items: Vec<ClassificationSample>) -> ClassificationBatch<B> {
        let batch_size  = items.len();
        let feature_dim = items.first().map_or(0, |s| s.features.len());

        // ── Flatten features row by row ───────────────────────────────────────
        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let targets: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let features = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([batch_size, feature_dim]);

        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        ClassificationBatch { features, targets }
    }
}
