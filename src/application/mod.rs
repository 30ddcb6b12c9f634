// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal:
// training a pipeline, or loading one to make predictions.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No CLI parsing or HTTP handling here
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The offline training workflow
pub mod train_use_case;

// The load-once, predict-many workflow
pub mod predict_use_case;
