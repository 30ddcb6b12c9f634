// ============================================================
// Layer 4 - Label Encoder
// ============================================================
// Fitted bijection between the distinct target labels seen at
// training time and the dense index range [0, K).
//
// Classes are stored sorted, so the same label set always gets
// the same indices regardless of row order:
//
//   labels:  joy, anger, fear, joy
//   classes: [anger, fear, joy]  ->  anger=0, fear=1, joy=2

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::{fs, path::Path};

use crate::domain::traits::Persistable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit over every label in `labels`; duplicates collapse.
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let classes: BTreeSet<&str> = labels.into_iter().collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Index of `label`, or `None` for a label absent at fit time.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    /// Encode a whole column; any unseen label is an error.
    pub fn encode_all<'a>(&self, labels: impl IntoIterator<Item = &'a str>) -> Result<Vec<usize>> {
        labels
            .into_iter()
            .map(|l| {
                self.encode(l)
                    .with_context(|| format!("Label '{l}' was not seen when fitting the encoder"))
            })
            .collect()
    }

    /// Label for class `index`, or `None` when out of range.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

impl Persistable for LabelEncoder {
    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write label encoder to '{}'", path.display()))
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read label encoder from '{}'", path.display()))?;
        let encoder: LabelEncoder = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt label encoder '{}'", path.display()))?;

        // binary_search in encode() relies on sorted, unique classes
        let sorted = encoder.classes.windows(2).all(|w| w[0] < w[1]);
        anyhow::ensure!(sorted, "Label encoder '{}' classes are not sorted and unique", path.display());
        Ok(encoder)
    }
}
