// ============================================================
// Layer 3 - Core Traits
// ============================================================
// Seams between the application layer and the concrete
// implementations in the data and infra layers.
//
//   DatasetSource  <- CsvDatasetLoader (data/loader.rs)
//   Persistable    <- LabelEncoder, TfidfVectorizer, StandardScaler

use anyhow::Result;
use std::path::Path;

use crate::domain::example::LabeledExample;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Anything that can produce the labeled examples of one dataset.
pub trait DatasetSource {
    /// Load every example, in file order.
    fn load_all(&self) -> Result<Vec<LabeledExample>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// A fitted artifact whose state round-trips through a single file.
pub trait Persistable: Sized {
    fn save(&self, path: &Path) -> Result<()>;

    fn load(path: &Path) -> Result<Self>;
}
