// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader and Adam.
//
//   - Training runs on TrainBackend (Autodiff<NdArray>)
//   - model.valid() drops autodiff and returns the same weights
//     on InferBackend (NdArray) for held-out evaluation
//   - argmax(1) returns [batch, 1], flattened before .equal()
//
// Held-out metrics are for observability only: the weights
// returned are always those after the final epoch.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::ClassificationBatcher, dataset::ClassificationDataset};
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::{Classifier, ClassifierConfig};

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type InferBackend = burn::backend::NdArray;

/// Final weights plus one metrics row per epoch.
pub struct TrainingOutcome {
    pub model:   Classifier<InferBackend>,
    pub metrics: Vec<EpochMetrics>,
}

pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &ClassifierConfig,
    train_dataset: ClassificationDataset,
    val_dataset:   ClassificationDataset,
) -> Result<TrainingOutcome> {
    if cfg.batch_size == 0 {
        bail!("Batch size must be at least 1");
    }
    if let Some(dim) = train_dataset.feature_dim() {
        if dim != model_cfg.input_dim {
            bail!(
                "Training samples have {} features but the classifier expects {}",
                dim,
                model_cfg.input_dim
            );
        }
    }

    let device = burn::backend::ndarray::NdArrayDevice::default();
    // Fixes weight initialisation; the DataLoader shuffle has its own seed
    TrainBackend::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: Classifier<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: layers {:?}, {} epochs, lr={}",
        model_cfg.layer_dims(),
        cfg.epochs,
        cfg.lr
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = AdamConfig::new().init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(ClassificationBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .build(train_dataset);

    let val_loader = DataLoaderBuilder::new(ClassificationBatcher::<InferBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .build(val_dataset);

    let mut history = Vec::with_capacity(cfg.epochs);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        let mut train = Tally::default();

        for batch in train_loader.iter() {
            let targets = batch.targets.clone();
            let rows    = targets.dims()[0];
            let (loss, logits) = model.forward_loss(batch.features, batch.targets);

            train.add(
                loss.clone().into_scalar().elem::<f64>(),
                count_correct(logits, targets),
                rows,
            );

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let mut val = Tally::default();

        for batch in val_loader.iter() {
            let targets = batch.targets.clone();
            let rows    = targets.dims()[0];
            let (loss, logits) = model_valid.forward_loss(batch.features, batch.targets);
            val.add(
                loss.into_scalar().elem::<f64>(),
                count_correct(logits, targets),
                rows,
            );
        }

        let metrics = EpochMetrics::new(
            epoch,
            train.mean_loss(),
            val.mean_loss(),
            train.accuracy(),
            val.accuracy(),
        );
        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | train_acc={:.1}% | val_acc={:.1}%",
            epoch,
            cfg.epochs,
            metrics.train_loss,
            metrics.val_loss,
            metrics.train_acc * 100.0,
            metrics.val_acc * 100.0,
        );
        history.push(metrics);
    }

    tracing::info!("Training complete");
    Ok(TrainingOutcome { model: model.valid(), metrics: history })
}

/// Rows in `logits` whose argmax equals the target index.
fn count_correct<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> usize {
    let predicted = logits.argmax(1).flatten::<1>(0, 1);
    let correct: i64 = predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    correct as usize
}

/// Running loss/accuracy totals over the batches of one phase.
#[derive(Default)]
struct Tally {
    loss_sum: f64,
    batches:  usize,
    correct:  usize,
    rows:     usize,
}

impl Tally {
    fn add(&mut self, loss: f64, correct: usize, rows: usize) {
        self.loss_sum += loss;
        self.batches  += 1;
        self.correct  += correct;
        self.rows     += rows;
    }

    fn mean_loss(&self) -> f64 {
        if self.batches > 0 { self.loss_sum / self.batches as f64 } else { f64::NAN }
    }

    fn accuracy(&self) -> f64 {
        if self.rows > 0 { self.correct as f64 / self.rows as f64 } else { 0.0 }
    }
}
