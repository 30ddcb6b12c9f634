// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates one offline training run in order:
//
//   Step 1: Load labeled rows from CSV        (Layer 4 - data)
//   Step 2: Fit the label encoder             (Layer 4 - data)
//   Step 3: Fit the feature transformer       (Layer 4 - data)
//   Step 4: Transform every row               (Layer 4 - data)
//   Step 5: Split train/validation            (Layer 4 - data)
//   Step 6: Run the training loop             (Layer 5 - ml)
//   Step 7: Persist all artifacts as a unit   (Layer 6 - infra)
//
// Nothing is written to the artifact directory unless every
// step before Step 7 succeeded.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::{ClassificationDataset, ClassificationSample},
    features::{FeatureTransformer, Scaling, TransformerKind},
    label_encoder::LabelEncoder,
    loader::CsvDatasetLoader,
    splitter::split_train_val,
};
use crate::domain::pipeline::PipelineKind;
use crate::domain::traits::DatasetSource;
use crate::infra::artifacts::{ArtifactStore, Manifest, TrainedArtifacts};
use crate::infra::metrics::EpochMetrics;
use crate::ml::model::ClassifierConfig;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Serialisable so the manifest
// records exactly how the artifacts were produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub pipeline:       PipelineKind,
    pub dataset:        String,
    pub artifact_dir:   String,
    pub feature_column: String,
    pub target_column:  String,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    pub seed:           u64,
    pub val_fraction:   f64,
    pub hidden_sizes:   Vec<usize>,
    pub scaling:        Scaling,
}

impl TrainConfig {
    /// Defaults for `kind`, reading from `dataset`.
    pub fn for_pipeline(kind: PipelineKind, dataset: impl Into<String>) -> Self {
        let spec = kind.spec();
        Self {
            pipeline:       kind,
            dataset:        dataset.into(),
            artifact_dir:   "artifacts".to_string(),
            feature_column: spec.feature_column.to_string(),
            target_column:  spec.target_column.to_string(),
            epochs:         spec.epochs,
            batch_size:     32,
            lr:             1e-3,
            seed:           42,
            val_fraction:   0.2,
            hidden_sizes:   spec.hidden_sizes.to_vec(),
            scaling:        Scaling::Standard,
        }
    }
}

/// What a finished run produced, for the CLI to print.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub pipeline:     PipelineKind,
    pub examples:     usize,
    pub classes:      Vec<String>,
    pub input_dim:    usize,
    pub train_size:   usize,
    pub val_size:     usize,
    pub final_epoch:  Option<EpochMetrics>,
    pub artifact_dir: PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg  = &self.config;
        let spec = cfg.pipeline.spec();

        if !(0.0..1.0).contains(&cfg.val_fraction) {
            bail!("Validation fraction must be in [0, 1), got {}", cfg.val_fraction);
        }
        if cfg.hidden_sizes.contains(&0) {
            bail!("Hidden layer widths must be at least 1, got {:?}", cfg.hidden_sizes);
        }

        // ── Step 1: Load the dataset ──────────────────────────────────────────
        tracing::info!("Training {} pipeline from '{}'", cfg.pipeline, cfg.dataset);
        let loader = CsvDatasetLoader::new(
            &cfg.dataset,
            &cfg.feature_column,
            &cfg.target_column,
            spec.feature_kind,
        );
        let examples = loader.load_all()?;

        // ── Step 2: Fit the label encoder ─────────────────────────────────────
        let encoder = LabelEncoder::fit(examples.iter().map(|e| e.label.as_str()));
        let labels  = encoder.encode_all(examples.iter().map(|e| e.label.as_str()))?;
        tracing::info!("{} classes: {:?}", encoder.num_classes(), encoder.classes());
        if encoder.num_classes() < 2 {
            tracing::warn!(
                "Only {} distinct label(s) in '{}'; the classifier will be degenerate",
                encoder.num_classes(),
                cfg.target_column
            );
        }

        // ── Step 3: Fit the feature transformer ───────────────────────────────
        let kind = TransformerKind::for_feature(spec.feature_kind, cfg.scaling);
        let raw: Vec<_> = examples.into_iter().map(|e| e.feature).collect();
        let transformer = FeatureTransformer::fit(kind, &raw)?;
        if transformer.dim() == 0 {
            bail!(
                "Column '{}' produced no features: no term of two or more characters",
                cfg.feature_column
            );
        }
        tracing::info!("Fitted {} transformer with {} features", kind, transformer.dim());

        // ── Step 4: Transform every row ───────────────────────────────────────
        let samples = raw
            .iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (feature, label))| {
                let features = transformer
                    .transform(feature)
                    .with_context(|| format!("Cannot transform training row {}", i + 1))?
                    .features;
                Ok(ClassificationSample { features, label })
            })
            .collect::<Result<Vec<_>>>()?;

        // ── Step 5: Train / validation split ──────────────────────────────────
        let total = samples.len();
        let (train_samples, val_samples) = split_train_val(samples, cfg.val_fraction, cfg.seed);
        let (train_size, val_size) = (train_samples.len(), val_samples.len());
        tracing::info!("Split: {} train, {} validation", train_size, val_size);

        // ── Step 6: Run the training loop ─────────────────────────────────────
        let classifier = ClassifierConfig::new(
            transformer.dim(),
            cfg.hidden_sizes.clone(),
            encoder.num_classes(),
        );
        let outcome = run_training(
            cfg,
            &classifier,
            ClassificationDataset::new(train_samples),
            ClassificationDataset::new(val_samples),
        )?;

        // ── Step 7: Persist ───────────────────────────────────────────────────
        let store = ArtifactStore::for_pipeline(&cfg.artifact_dir, cfg.pipeline);
        let report = TrainReport {
            pipeline:     cfg.pipeline,
            examples:     total,
            classes:      encoder.classes().to_vec(),
            input_dim:    transformer.dim(),
            train_size,
            val_size,
            final_epoch:  outcome.metrics.last().cloned(),
            artifact_dir: store.dir().to_path_buf(),
        };
        store.save(&TrainedArtifacts {
            encoder,
            transformer,
            model: outcome.model,
            manifest: Manifest {
                pipeline:    cfg.pipeline,
                classifier,
                transformer: kind,
                train:       cfg.clone(),
            },
            metrics: outcome.metrics,
        })?;

        Ok(report)
    }
}

/// Train one pipeline and persist its artifacts.
pub fn train(config: TrainConfig) -> Result<TrainReport> {
    TrainUseCase::new(config).execute()
}
