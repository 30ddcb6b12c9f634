// ============================================================
// Layer 5 - Inferencer
// ============================================================
// Runs the trained classifier on one feature vector at a time.
//
// The weights are copied out of the Burn module into plain
// tensors when the inferencer is built. A Module keeps lazy
// parameter state that is not Sync, while detached tensors
// are, so one Inferencer can sit behind an Arc and serve
// concurrent requests without a lock.
//
//   features [1, D] → (matmul + bias → ReLU)* → matmul + bias
//                   → softmax → probabilities [K]

use burn::{
    prelude::*,
    tensor::activation::{relu, softmax},
};

use crate::domain::error::PredictError;
use crate::ml::model::Classifier;
use crate::ml::trainer::InferBackend;

struct DenseLayer {
    /// Shape: [d_input, d_output]
    weight: Tensor<InferBackend, 2>,
    bias:   Option<Tensor<InferBackend, 1>>,
}

impl DenseLayer {
    fn forward(&self, x: Tensor<InferBackend, 2>) -> Tensor<InferBackend, 2> {
        let out = x.matmul(self.weight.clone());
        match &self.bias {
            Some(bias) => out + bias.clone().unsqueeze(),
            None       => out,
        }
    }
}

pub struct Inferencer {
    layers:      Vec<DenseLayer>,
    input_dim:   usize,
    num_classes: usize,
    device:      burn::backend::ndarray::NdArrayDevice,
}

impl Inferencer {
    pub fn from_model(model: Classifier<InferBackend>) -> Self {
        let dims        = model.layer_dims();
        let input_dim   = dims.first().map_or(0, |&(d_in, _)| d_in);
        let num_classes = dims.last().map_or(0, |&(_, d_out)| d_out);

        let layers: Vec<DenseLayer> = model
            .hidden
            .iter()
            .chain(std::iter::once(&model.output))
            .map(|linear| DenseLayer {
                weight: linear.weight.val(),
                bias:   linear.bias.as_ref().map(|b| b.val()),
            })
            .collect();

        Self {
            layers,
            input_dim,
            num_classes,
            device: Default::default(),
        }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Softmax distribution over the classes for one feature vector.
    pub fn probabilities(&self, features: &[f32]) -> Result<Vec<f32>, PredictError> {
        if features.len() != self.input_dim {
            return Err(PredictError::DimensionMismatch {
                expected: self.input_dim,
                actual:   features.len(),
            });
        }

        let x = Tensor::<InferBackend, 1>::from_floats(features, &self.device)
            .reshape([1, self.input_dim]);

        let last = self.layers.len().saturating_sub(1);
        let logits = self.layers.iter().enumerate().fold(x, |x, (i, layer)| {
            let out = layer.forward(x);
            if i < last { relu(out) } else { out }
        });

        softmax(logits, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| PredictError::Inference(format!("{e:?}")))
    }

    /// Most probable class index and its probability.
    pub fn predict(&self, features: &[f32]) -> Result<(usize, f32), PredictError> {
        let probs = self.probabilities(features)?;
        argmax(&probs).ok_or_else(|| PredictError::Inference("classifier has no outputs".into()))
    }
}

/// Index of the largest value; the lowest index wins a tie.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::ClassifierConfig;

    fn inferencer(input_dim: usize, classes: usize) -> Inferencer {
        let device = Default::default();
        let model  = ClassifierConfig::new(input_dim, vec![8], classes).init::<InferBackend>(&device);
        Inferencer::from_model(model)
    }

    #[test]
    fn test_argmax_prefers_lowest_index_on_tie() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some((1, 0.4)));
        assert_eq!(argmax(&[0.5]), Some((0, 0.5)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let inf   = inferencer(3, 4);
        let probs = inf.probabilities(&[0.1, -0.3, 0.7]).unwrap();
        assert_eq!(probs.len(), 4);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_wrong_length_is_dimension_mismatch() {
        let inf = inferencer(3, 2);
        assert_eq!(
            inf.predict(&[1.0]),
            Err(PredictError::DimensionMismatch { expected: 3, actual: 1 })
        );
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let inf = inferencer(2, 3);
        assert_eq!(inf.predict(&[0.5, 0.5]), inf.predict(&[0.5, 0.5]));
    }

    #[test]
    fn test_matches_module_forward() {
        let device = Default::default();
        let model  = ClassifierConfig::new(2, vec![4, 3], 2).init::<InferBackend>(&device);
        let x      = Tensor::<InferBackend, 2>::from_floats([[0.3, -1.2]], &device);
        let expected: Vec<f32> = softmax(model.forward(x), 1).into_data().to_vec().unwrap();

        let inf = Inferencer::from_model(model);
        let got = inf.probabilities(&[0.3, -1.2]).unwrap();
        for (a, b) in got.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_inferencer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Inferencer>();
    }
}
