// ============================================================
// Layer 5 - Dense Classifier
// ============================================================
// Feed-forward network from a feature vector to class logits:
//
//   input [N, D]
//     → Linear(D, h1) → ReLU
//     → Linear(h1, h2) → ReLU       (one block per hidden size)
//     → Linear(h_last, K)          → logits [N, K]
//
// Softmax is applied by the inferencer; the loss works on raw
// logits through CrossEntropyLoss.

use burn::{
    nn::{loss::CrossEntropyLossConfig, Linear, LinearConfig, Relu},
    prelude::*,
};

// #[derive(Config)] already provides Clone and Serialize/Deserialize.
#[derive(Config, Debug, PartialEq)]
pub struct ClassifierConfig {
    pub input_dim:    usize,
    pub hidden_sizes: Vec<usize>,
    pub num_classes:  usize,
}

impl ClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Classifier<B> {
        let mut dims = self.layer_dims();
        let (out_in, out_out) = dims.pop().unwrap_or((self.input_dim, self.num_classes));

        let hidden = dims
            .into_iter()
            .map(|(d_in, d_out)| LinearConfig::new(d_in, d_out).init(device))
            .collect();
        let output = LinearConfig::new(out_in, out_out).init(device);

        Classifier { hidden, output, activation: Relu::new() }
    }

    /// `(d_input, d_output)` of every Linear layer, output layer last.
    pub fn layer_dims(&self) -> Vec<(usize, usize)> {
        let widths: Vec<usize> = std::iter::once(self.input_dim)
            .chain(self.hidden_sizes.iter().copied())
            .chain(std::iter::once(self.num_classes))
            .collect();
        widths.windows(2).map(|w| (w[0], w[1])).collect()
    }
}

#[derive(Module, Debug)]
pub struct Classifier<B: Backend> {
    pub hidden:     Vec<Linear<B>>,
    pub output:     Linear<B>,
    pub activation: Relu,
}

impl<B: Backend> Classifier<B> {
    /// features: [batch, input_dim] → logits: [batch, num_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self
            .hidden
            .iter()
            .fold(features, |x, layer| self.activation.forward(layer.forward(x)));
        self.output.forward(x)
    }

    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(features);
        let loss   = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }

    /// Actual `(d_input, d_output)` of every Linear layer, as loaded.
    pub fn layer_dims(&self) -> Vec<(usize, usize)> {
        self.hidden
            .iter()
            .chain(std::iter::once(&self.output))
            .map(|layer| {
                let [d_in, d_out] = layer.weight.val().dims();
                (d_in, d_out)
            })
            .collect()
    }
}

/// Layer shapes stored in a weights record, output layer last.
pub fn record_layer_dims<B: Backend>(record: &ClassifierRecord<B>) -> Vec<(usize, usize)> {
    record
        .hidden
        .iter()
        .chain(std::iter::once(&record.output))
        .map(|layer| {
            let [d_in, d_out] = layer.weight.val().dims();
            (d_in, d_out)
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray;

    #[test]
    fn test_layer_dims_chain() {
        let cfg = ClassifierConfig::new(10, vec![32, 16], 3);
        assert_eq!(cfg.layer_dims(), vec![(10, 32), (32, 16), (16, 3)]);
    }

    #[test]
    fn test_output_width_equals_class_count() {
        let device = Default::default();
        let model  = ClassifierConfig::new(4, vec![16, 8], 3).init::<B>(&device);
        let logits = model.forward(Tensor::<B, 2>::zeros([5, 4], &device));
        assert_eq!(logits.dims(), [5, 3]);
    }

    #[test]
    fn test_built_layers_match_config() {
        let device = Default::default();
        let cfg    = ClassifierConfig::new(1, vec![16, 8], 2);
        let model  = cfg.init::<B>(&device);
        assert_eq!(model.layer_dims(), cfg.layer_dims());
    }

    #[test]
    fn test_record_dims_match_module_dims() {
        let device = Default::default();
        let model  = ClassifierConfig::new(5, vec![3], 2).init::<B>(&device);
        let dims   = model.layer_dims();
        assert_eq!(record_layer_dims(&model.into_record()), dims);
    }

    #[test]
    fn test_no_hidden_layers_is_a_linear_model() {
        let device = Default::default();
        let model  = ClassifierConfig::new(3, vec![], 2).init::<B>(&device);
        assert!(model.hidden.is_empty());
        assert_eq!(model.layer_dims(), vec![(3, 2)]);
    }

    #[test]
    fn test_loss_is_finite_scalar() {
        let device  = Default::default();
        let model   = ClassifierConfig::new(2, vec![4], 2).init::<B>(&device);
        let x       = Tensor::<B, 2>::from_floats([[0.0, 1.0], [1.0, 0.0]], &device);
        let y       = Tensor::<B, 1, Int>::from_ints([1, 0], &device);
        let (loss, _) = model.forward_loss(x, y);
        let value: f32 = loss.into_scalar().elem();
        assert!(value.is_finite() && value > 0.0);
    }
}
