// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the three subcommands, `train`, `serve` and
// `predict`, with all their configurable flags.
//
// Flags left unset fall back to the pipeline's defaults (column
// names, epochs, hidden sizes, port). The artifact directory and
// port can also come from MINDCHECK_* environment variables.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::predict_use_case::OovPolicy;
use crate::application::train_use_case::TrainConfig;
use crate::data::features::Scaling;
use crate::domain::pipeline::PipelineKind;
use crate::server::ServeConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a pipeline on a CSV dataset and write its artifacts
    Train(TrainArgs),

    /// Load trained artifacts and serve the prediction endpoint
    Serve(ServeArgs),

    /// Load trained artifacts and classify a single input
    Predict(PredictArgs),
}

// ─── Value enums ──────────────────────────────────────────────────────────────
// clap-facing mirrors of the application enums, so the lower
// layers never depend on clap.

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineArg {
    Emotion,
    Stress,
}

impl From<PipelineArg> for PipelineKind {
    fn from(p: PipelineArg) -> Self {
        match p {
            PipelineArg::Emotion => PipelineKind::Emotion,
            PipelineArg::Stress  => PipelineKind::Stress,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalingArg {
    Standard,
    None,
}

impl From<ScalingArg> for Scaling {
    fn from(s: ScalingArg) -> Self {
        match s {
            ScalingArg::Standard => Scaling::Standard,
            ScalingArg::None     => Scaling::None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OovArg {
    Ignore,
    Reject,
}

impl From<OovArg> for OovPolicy {
    fn from(o: OovArg) -> Self {
        match o {
            OovArg::Ignore => OovPolicy::Ignore,
            OovArg::Reject => OovPolicy::Reject,
        }
    }
}

// ─── train ────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[arg(long, value_enum)]
    pub pipeline: PipelineArg,

    /// CSV file with a header row
    #[arg(long)]
    pub dataset: String,

    /// Directory the artifacts are written to
    #[arg(long, env = "MINDCHECK_ARTIFACT_DIR", default_value = "artifacts")]
    pub artifact_dir: String,

    /// Input column (default: message / heart_rate)
    #[arg(long)]
    pub feature_column: Option<String>,

    /// Label column (default: emotion / anxiety_level)
    #[arg(long)]
    pub target_column: Option<String>,

    /// Passes over the training set (default: 30 / 50)
    #[arg(long)]
    pub epochs: Option<usize>,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Seeds the split, the batch shuffle and weight initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Comma-separated hidden layer widths (default: 32,16 / 16,8)
    #[arg(long, value_delimiter = ',')]
    pub hidden_sizes: Option<Vec<usize>>,

    /// How a numeric feature is scaled before training.
    /// Raw heart rates (`none`) need a larger --lr, e.g. 0.01
    #[arg(long, value_enum, default_value_t = ScalingArg::Standard)]
    pub scaling: ScalingArg,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        let defaults = TrainConfig::for_pipeline(a.pipeline.into(), a.dataset);
        TrainConfig {
            artifact_dir:   a.artifact_dir,
            feature_column: a.feature_column.unwrap_or(defaults.feature_column),
            target_column:  a.target_column.unwrap_or(defaults.target_column),
            epochs:         a.epochs.unwrap_or(defaults.epochs),
            batch_size:     a.batch_size,
            lr:             a.lr,
            seed:           a.seed,
            val_fraction:   a.val_fraction,
            hidden_sizes:   a.hidden_sizes.unwrap_or(defaults.hidden_sizes),
            scaling:        a.scaling.into(),
            ..defaults
        }
    }
}

// ─── serve ────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, value_enum)]
    pub pipeline: PipelineArg,

    #[arg(long, env = "MINDCHECK_ARTIFACT_DIR", default_value = "artifacts")]
    pub artifact_dir: String,

    #[arg(long, env = "MINDCHECK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port (default: 5000 / 5001)
    #[arg(long, env = "MINDCHECK_PORT")]
    pub port: Option<u16>,

    /// What to do with words never seen in training
    #[arg(long, value_enum, default_value_t = OovArg::Ignore)]
    pub oov: OovArg,
}

impl From<ServeArgs> for ServeConfig {
    fn from(a: ServeArgs) -> Self {
        let defaults = ServeConfig::for_pipeline(a.pipeline.into());
        ServeConfig {
            artifact_dir: a.artifact_dir,
            host:         a.host,
            port:         a.port.unwrap_or(defaults.port),
            oov:          a.oov.into(),
            ..defaults
        }
    }
}

// ─── predict ──────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long, value_enum)]
    pub pipeline: PipelineArg,

    #[arg(long, env = "MINDCHECK_ARTIFACT_DIR", default_value = "artifacts")]
    pub artifact_dir: String,

    /// Text message or heart-rate value to classify
    #[arg(long)]
    pub input: String,

    #[arg(long, value_enum, default_value_t = OovArg::Ignore)]
    pub oov: OovArg,
}
