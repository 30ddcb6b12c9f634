#![recursion_limit = "256"]

// ============================================================
// mindcheck
// ============================================================
// Two small classifiers sharing one train → persist → serve
// implementation:
//
//   emotion:  free text  → emotion label        (TF-IDF + dense net)
//   stress:   heart rate → anxiety level        (scaled scalar + dense net)
//
// Layers, outermost first:
//   1. cli, server   - argument parsing, HTTP endpoints
//   2. application   - training run, predictor
//   3. domain        - plain types shared by every layer
//   4. data          - CSV loading, encoders, transformers, batching
//   5. ml            - Burn model, training loop, inference
//   6. infra         - artifact files, tokenizer JSON, metrics CSV

pub mod cli;
pub mod server;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;

pub use application::predict_use_case::{OovPolicy, Prediction, Predictor};
pub use application::train_use_case::{train, TrainConfig, TrainReport};
pub use domain::pipeline::PipelineKind;
