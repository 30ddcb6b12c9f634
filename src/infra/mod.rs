// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// File formats and persistence shared by the train and serve
// sides:
//
//   artifacts.rs       - Artifact directory contract
//                        Saves a training run atomically and
//                        reloads it with consistency checks.
//
//   tokenizer_store.rs - WordLevel tokenizer JSON
//                        Builds the tokenizer that backs the
//                        TF-IDF vocabulary and round-trips it.
//
//   metrics.rs         - Training metrics logging
//                        Writes per-epoch loss and accuracy to
//                        a CSV file next to the model.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Atomic save and validated load of pipeline artifacts
pub mod artifacts;

/// WordLevel tokenizer construction and serialization
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;
