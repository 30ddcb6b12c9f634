use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One transformed training row: a feature vector and its class index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSample {
    pub features: Vec<f32>,
    pub label:    usize,
}

pub struct ClassificationDataset {
    samples: Vec<ClassificationSample>,
}

impl ClassificationDataset {
    pub fn new(samples: Vec<ClassificationSample>) -> Self { Self { samples } }

    pub fn feature_dim(&self) -> Option<usize> {
        self.samples.first().map(|s| s.features.len())
    }
}

impl Dataset<ClassificationSample> for ClassificationDataset {
    fn get(&self, index: usize) -> Option<ClassificationSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
