// ============================================================
// Layer 6 - Word-Level Tokenizer Store
// ============================================================
// Builds and reloads the HuggingFace WordLevel tokenizer that
// backs the TF-IDF vocabulary.
//
// The tokenizer JSON is written by hand and loaded back through
// Tokenizer::from_str, the same path used when the vectorizer
// artifact is read from disk.
//
// Vocabulary ids are the feature columns of the TF-IDF matrix:
//   terms (sorted)  ->  0 .. n-1
//   [UNK]           ->  n
//
// Reference: tokenizers crate documentation (serialization format)

use anyhow::{anyhow, Context, Result};
use std::str::FromStr;
use tokenizers::{NormalizedString, Normalizer, Tokenizer};

pub const UNK_TOKEN: &str = "[UNK]";

/// Tokenizer JSON for a word-level vocabulary over `terms`.
/// NFC-composes and lowercases input, then splits on `\w+|[^\w\s]+`.
pub fn word_level_json(terms: &[String]) -> serde_json::Value {
    let mut vocab = serde_json::Map::with_capacity(terms.len() + 1);
    for (id, term) in terms.iter().enumerate() {
        vocab.insert(term.clone(), serde_json::json!(id));
    }
    vocab.insert(UNK_TOKEN.to_string(), serde_json::json!(terms.len()));

    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": {
            "type": "Sequence",
            "normalizers": [{ "type": "NFC" }, { "type": "Lowercase" }]
        },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": UNK_TOKEN
        }
    })
}

/// Build a ready-to-use tokenizer over `terms`.
pub fn build_word_level(terms: &[String]) -> Result<Tokenizer> {
    from_json(&word_level_json(terms))
}

/// Parse a tokenizer from its serialized JSON form.
pub fn from_json(json: &serde_json::Value) -> Result<Tokenizer> {
    Tokenizer::from_str(&json.to_string())
        .map_err(|e| anyhow!("Cannot build tokenizer: {e}"))
}

/// Serialize a tokenizer back into JSON.
pub fn to_json(tokenizer: &Tokenizer) -> Result<serde_json::Value> {
    let s = tokenizer
        .to_string(false)
        .map_err(|e| anyhow!("Cannot serialize tokenizer: {e}"))?;
    serde_json::from_str(&s).context("Tokenizer produced invalid JSON")
}

/// Run the tokenizer's normalizer over `text` on its own.
pub fn normalize(tokenizer: &Tokenizer, text: &str) -> Result<String> {
    let mut normalized = NormalizedString::from(text);
    if let Some(normalizer) = tokenizer.get_normalizer() {
        normalizer
            .normalize(&mut normalized)
            .map_err(|e| anyhow!("Cannot normalize text: {e}"))?;
    }
    Ok(normalized.get().to_string())
}

/// Id assigned to out-of-vocabulary words.
pub fn unk_id(tokenizer: &Tokenizer) -> Result<u32> {
    tokenizer
        .token_to_id(UNK_TOKEN)
        .with_context(|| format!("Tokenizer has no {UNK_TOKEN} token"))
}
