// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types and traits shared by both pipelines.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O or network calls
//   - Only structs, enums, traits and pure rules
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Raw features and labeled dataset rows
pub mod example;

// Per-pipeline configuration: columns, architecture, artifact names
pub mod pipeline;

// Request-level prediction errors
pub mod error;

// Rule-based heart-rate trend summary
pub mod heart_rate;

// Seams implemented by the data and infra layers
pub mod traits;
