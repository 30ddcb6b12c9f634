// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Records per-epoch training metrics to a CSV file that sits
// next to the model artifacts.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: mean cross-entropy over training batches
//   - val_loss:   mean cross-entropy over held-out batches
//   - train_acc:  fraction of training rows classified correctly
//   - val_acc:    fraction of held-out rows classified correctly
//
// Example output (emotion_detector_metrics.csv):
//   epoch,train_loss,val_loss,train_acc,val_acc
//   1,1.098100,1.097400,0.375000,0.333333
//   2,1.091200,1.095800,0.500000,0.333333
//
// An empty held-out set leaves val_loss as NaN and val_acc as 0.
//
// Reference: csv crate documentation (Writer::serialize)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    pub train_loss: f64,

    /// Tracks train_loss until the model starts to overfit
    pub val_loss: f64,

    /// Range: [0.0, 1.0]
    pub train_acc: f64,

    /// Range: [0.0, 1.0]
    pub val_acc: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        val_loss:   f64,
        train_acc:  f64,
        val_acc:    f64,
    ) -> Self {
        Self { epoch, train_loss, val_loss, train_acc, val_acc }
    }
}

/// Writes epoch metrics as CSV rows, header first.
pub struct MetricsLogger {
    writer: csv::Writer<File>,
}

impl MetricsLogger {
    /// Create (or truncate) the CSV file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let writer = csv::Writer::from_path(path)
            .with_context(|| format!("Cannot create metrics file '{}'", path.display()))?;
        tracing::debug!("Created metrics CSV: '{}'", path.display());
        Ok(Self { writer })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&mut self, m: &EpochMetrics) -> Result<()> {
        self.writer
            .serialize(m)
            .with_context(|| format!("Cannot write metrics for epoch {}", m.epoch))
    }

    /// Flush buffered rows to disk.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().context("Cannot flush metrics file")
    }

    /// Write every epoch in one go.
    pub fn write_all(path: &Path, metrics: &[EpochMetrics]) -> Result<()> {
        let mut logger = Self::create(path)?;
        for m in metrics {
            logger.log(m)?;
        }
        logger.finish()
    }
}

/// Read a metrics CSV back, e.g. to report the last epoch.
pub fn read_metrics(path: &Path) -> Result<Vec<EpochMetrics>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Cannot open metrics file '{}'", path.display()))?;
    reader
        .deserialize()
        .collect::<Result<Vec<EpochMetrics>, _>>()
        .with_context(|| format!("Corrupt metrics file '{}'", path.display()))
}
