// ============================================================
// Layer 4 - CSV Dataset Loader
// ============================================================
// Reads a header-row CSV file and yields one LabeledExample per
// row, taking the configured feature and target columns.
//
//   message,emotion                 heart_rate,anxiety_level
//   I feel great today,joy          72,low
//   this is terrible,anger          131,high
//
// Failure is fatal for a training run: an unreadable file, a
// missing column, an empty dataset or an unparsable number all
// surface as errors with the offending row number.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::domain::example::{FeatureKind, LabeledExample, RawFeature};
use crate::domain::traits::DatasetSource;

pub struct CsvDatasetLoader {
    path:           PathBuf,
    feature_column: String,
    target_column:  String,
    feature_kind:   FeatureKind,
}

impl CsvDatasetLoader {
    pub fn new(
        path:           impl AsRef<Path>,
        feature_column: impl Into<String>,
        target_column:  impl Into<String>,
        feature_kind:   FeatureKind,
    ) -> Self {
        Self {
            path:           path.as_ref().to_path_buf(),
            feature_column: feature_column.into(),
            target_column:  target_column.into(),
            feature_kind,
        }
    }

    fn parse_feature(&self, raw: &str, row: usize) -> Result<RawFeature> {
        match self.feature_kind {
            FeatureKind::Text => Ok(RawFeature::Text(raw.to_string())),
            FeatureKind::Scalar => {
                let value: f32 = raw.parse().with_context(|| {
                    format!(
                        "Row {row}: column '{}' is not numeric: '{raw}'",
                        self.feature_column
                    )
                })?;
                if !value.is_finite() {
                    bail!("Row {row}: column '{}' is not finite: '{raw}'", self.feature_column);
                }
                Ok(RawFeature::Scalar(value))
            }
        }
    }
}

impl DatasetSource for CsvDatasetLoader {
    fn load_all(&self) -> Result<Vec<LabeledExample>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| format!("Cannot open dataset '{}'", self.path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Cannot read header row of '{}'", self.path.display()))?
            .clone();

        let column = |name: &str| -> Result<usize> {
            headers.iter().position(|h| h == name).with_context(|| {
                format!(
                    "Dataset '{}' has no column '{}' (found: {})",
                    self.path.display(),
                    name,
                    headers.iter().collect::<Vec<_>>().join(", ")
                )
            })
        };
        let feature_idx = column(&self.feature_column)?;
        let target_idx  = column(&self.target_column)?;

        let mut examples = Vec::new();
        for (i, record) in reader.records().enumerate() {
            // Header is line 1, so the first record is line 2
            let row    = i + 2;
            let record = record.with_context(|| format!("Row {row}: malformed CSV record"))?;

            let raw_feature = record
                .get(feature_idx)
                .with_context(|| format!("Row {row}: missing '{}'", self.feature_column))?;
            let label = record
                .get(target_idx)
                .with_context(|| format!("Row {row}: missing '{}'", self.target_column))?;

            let feature = self.parse_feature(raw_feature, row)?;
            examples.push(LabeledExample::new(feature, label));
        }

        if examples.is_empty() {
            bail!(
                "Dataset '{}' has no rows: target column '{}' is empty",
                self.path.display(),
                self.target_column
            );
        }

        tracing::info!(
            "Loaded {} examples from '{}'",
            examples.len(),
            self.path.display()
        );
        Ok(examples)
    }
}
