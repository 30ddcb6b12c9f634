// ============================================================
// Layer 4 - TF-IDF Vectorizer
// ============================================================
// Turns free text into a fixed-length vector, one column per
// vocabulary term learned from the training corpus.
//
//   term extraction: NFC-compose, lowercase, split into
//                    word/punctuation runs, keep word runs of two
//                    or more characters
//   tf(t, d)  = raw count of t in d
//   idf(t)    = ln((1 + n) / (1 + df(t))) + 1
//   vector    = tf * idf, then L2-normalised
//
// Vocabulary columns are sorted, so the layout depends only on
// the set of terms. The vocabulary itself is persisted as a
// WordLevel tokenizer (see infra/tokenizer_store.rs).
//
// Terms that never appeared in training are not part of the
// vector. They are reported back to the caller, which decides
// whether to ignore or reject them.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::{fs, path::Path};
use tokenizers::Tokenizer;

use crate::domain::traits::Persistable;
use crate::infra::tokenizer_store;

/// Output of transforming one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Vectorized {
    pub features:      Vec<f32>,
    /// Out-of-vocabulary terms, in order of appearance
    pub unknown_terms: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
    idf:       Vec<f32>,
    unk_id:    u32,
}

/// On-disk layout of the vectorizer artifact.
#[derive(Serialize, Deserialize)]
struct VectorizerFile {
    tokenizer: serde_json::Value,
    idf:       Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and document frequencies from `documents`.
    pub fn fit<'a>(documents: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        // An empty vocabulary tokenizer still splits words and reports
        // their offsets, which is all term extraction needs.
        let analyzer = tokenizer_store::build_word_level(&[])?;

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        let mut n_docs = 0usize;

        for doc in documents {
            n_docs += 1;
            let terms: BTreeSet<String> = extract_terms(&analyzer, doc)?
                .into_iter()
                .map(|(_, term)| term)
                .collect();
            for term in terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // BTreeMap iterates in sorted order: column i is the i-th term
        let terms: Vec<String> = doc_freq.keys().cloned().collect();
        let idf: Vec<f32> = doc_freq
            .values()
            .map(|&df| smooth_idf(n_docs, df))
            .collect();

        let tokenizer = tokenizer_store::build_word_level(&terms)?;
        let unk_id    = tokenizer_store::unk_id(&tokenizer)?;

        tracing::info!(
            "Fitted TF-IDF vocabulary: {} terms over {} documents",
            terms.len(),
            n_docs
        );
        Ok(Self { tokenizer, idf, unk_id })
    }

    /// Number of vocabulary terms, i.e. the output vector length.
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    /// Column index of `term`, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.tokenizer
            .token_to_id(term)
            .filter(|&id| id != self.unk_id)
            .map(|id| id as usize)
    }

    pub fn transform(&self, text: &str) -> Result<Vectorized> {
        let text     = tokenizer_store::normalize(&self.tokenizer, text)?;
        let text     = text.as_str();
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow!("Tokenisation error: {e}"))?;

        let mut features      = vec![0.0f32; self.dim()];
        let mut unknown_terms = Vec::new();

        for (&id, &(start, end)) in encoding.get_ids().iter().zip(encoding.get_offsets()) {
            let Some(term) = text.get(start..end).and_then(as_term) else {
                continue;
            };
            if id == self.unk_id {
                unknown_terms.push(term);
            } else if let Some(slot) = features.get_mut(id as usize) {
                *slot += 1.0;
            }
        }

        for (value, idf) in features.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        l2_normalize(&mut features);

        Ok(Vectorized { features, unknown_terms })
    }
}

impl Persistable for TfidfVectorizer {
    fn save(&self, path: &Path) -> Result<()> {
        let file = VectorizerFile {
            tokenizer: tokenizer_store::to_json(&self.tokenizer)?,
            idf:       self.idf.clone(),
        };
        fs::write(path, serde_json::to_string(&file)?)
            .with_context(|| format!("Cannot write vectorizer to '{}'", path.display()))
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read vectorizer from '{}'", path.display()))?;
        let file: VectorizerFile = serde_json::from_str(&json)
            .with_context(|| format!("Corrupt vectorizer '{}'", path.display()))?;

        let tokenizer = tokenizer_store::from_json(&file.tokenizer)?;
        let unk_id    = tokenizer_store::unk_id(&tokenizer)?;

        let vocab_size = tokenizer.get_vocab_size(false);
        anyhow::ensure!(
            vocab_size == file.idf.len() + 1 && unk_id as usize == file.idf.len(),
            "Vectorizer '{}' is inconsistent: {} vocabulary entries, {} idf weights",
            path.display(),
            vocab_size,
            file.idf.len()
        );
        Ok(Self { tokenizer, idf: file.idf, unk_id })
    }
}

/// Lowercased terms of `text` paired with their token ids.
fn extract_terms(tokenizer: &Tokenizer, text: &str) -> Result<Vec<(u32, String)>> {
    let text     = tokenizer_store::normalize(tokenizer, text)?;
    let text     = text.as_str();
    let encoding = tokenizer
        .encode(text, false)
        .map_err(|e| anyhow!("Tokenisation error: {e}"))?;
    Ok(encoding
        .get_ids()
        .iter()
        .zip(encoding.get_offsets())
        .filter_map(|(&id, &(start, end))| {
            text.get(start..end).and_then(as_term).map(|t| (id, t))
        })
        .collect())
}

/// A token counts as a term when it is a word run of at least two characters.
/// Punctuation runs never hold a letter or digit; word runs may also carry
/// combining marks.
fn as_term(token: &str) -> Option<String> {
    let is_word = token.chars().any(|c| c.is_alphanumeric() || c == '_');
    if is_word && token.chars().count() >= 2 {
        Some(token.to_lowercase())
    } else {
        None
    }
}

fn smooth_idf(n_docs: usize, doc_freq: usize) -> f32 {
    (((1 + n_docs) as f64 / (1 + doc_freq) as f64).ln() + 1.0) as f32
}

fn l2_normalize(values: &mut [f32]) {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        values.iter_mut().for_each(|v| *v /= norm);
    }
}
