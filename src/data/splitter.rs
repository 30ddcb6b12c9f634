// ============================================================
// Layer 4 - Train/Validation Splitter
// ============================================================
// Shuffles samples with a seeded RNG and splits off a held-out
// set used only for per-epoch observability.
//
//   held-out size = ceil(n * val_fraction)
//
// At least one sample always stays on the training side.
//
// The seed fixes the permutation, so the same dataset and seed
// always produce the same train/validation membership.
//
// Reference: rand crate documentation (SeedableRng, SliceRandom)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, validation).
pub fn split_train_val<T>(mut samples: Vec<T>, val_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total = samples.len();
    let n_val = ((total as f64) * val_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let n_val = n_val.min(total.saturating_sub(1));

    // split_off(n) keeps [0..n) and returns the tail as the held-out set
    let val = samples.split_off(total - n_val);

    tracing::debug!(
        "Dataset split: {} training, {} validation (seed {})",
        samples.len(),
        val.len(),
        seed
    );

    (samples, val)
}
