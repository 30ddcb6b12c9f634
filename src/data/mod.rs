// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from a CSV file to tensor batches, plus the fitted
// artifacts that are reused at serving time.
//
//   dataset.csv
//       │
//       ▼
//   CsvDatasetLoader    → LabeledExample rows
//       │
//       ├──► LabelEncoder        → class index per label
//       └──► FeatureTransformer  → fixed-length vector per row
//              (TF-IDF vectorizer, standard scaler or identity)
//       │
//       ▼
//   split_train_val     → seeded 80/20 split
//       │
//       ▼
//   ClassificationDataset / ClassificationBatcher
//       │
//       ▼
//   DataLoader          → batches for the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads labeled rows from a header-row CSV file
pub mod loader;

/// Label string <-> class index bijection
pub mod label_encoder;

/// TF-IDF over a WordLevel tokenizer vocabulary
pub mod vectorizer;

/// Mean/deviation scaling for scalar features
pub mod scaler;

/// Per-pipeline choice of vectorizer, scaler or identity
pub mod features;

/// Implements Burn's Dataset trait for transformed samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded train/validation split
pub mod splitter;
