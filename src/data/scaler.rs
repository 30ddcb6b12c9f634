// ============================================================
// Layer 4 - Standard Scaler
// ============================================================
// Centers a scalar feature on the training mean and divides by
// the training standard deviation (population form):
//
//   x' = (x - mean) / std
//
// A constant column has std 0; it is stored as 1.0 so the
// transform stays finite and maps every value to x - mean.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::domain::traits::Persistable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: f32,
    pub std:  f32,
}

impl StandardScaler {
    pub fn fit(values: &[f32]) -> Result<Self> {
        if values.is_empty() {
            bail!("Cannot fit a scaler on an empty column");
        }
        let n    = values.len() as f64;
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var  = values
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        let std = var.sqrt();

        Ok(Self {
            mean: mean as f32,
            std:  if std > f64::EPSILON { std as f32 } else { 1.0 },
        })
    }

    pub fn transform(&self, value: f32) -> f32 {
        (value - self.mean) / self.std
    }
}

impl Persistable for StandardScaler {
    fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write scaler to '{}'", path.display()))
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read scaler from '{}'", path.display()))?;
        let scaler: StandardScaler = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt scaler '{}'", path.display()))?;
        anyhow::ensure!(
            scaler.mean.is_finite() && scaler.std.is_finite() && scaler.std > 0.0,
            "Scaler '{}' has invalid parameters: {:?}",
            path.display(),
            scaler
        );
        Ok(scaler)
    }
}
