// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All Burn model, training and inference code lives here.
//
//   model.rs      - Dense classifier: Linear + ReLU blocks and
//                   a linear output of width K
//
//   trainer.rs    - Training loop: forward pass, cross-entropy,
//                   backward pass, Adam step, held-out metrics
//
//   inferencer.rs - Frozen weights for serving: one vector in,
//                   softmax distribution and argmax out
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Feed-forward classifier architecture
pub mod model;

/// Training loop with per-epoch validation
pub mod trainer;

/// Inference engine over detached weights
pub mod inferencer;
