// ============================================================
// Layer 3 - Prediction Errors
// ============================================================
// Request-level failures. Training and artifact loading are
// fatal and use anyhow; a single prediction must instead fail
// in a way the HTTP layer can turn into a client error.

use thiserror::Error;

use crate::domain::example::FeatureKind;

#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    /// The request did not carry the field the pipeline reads
    #[error("missing field '{0}'")]
    MissingField(String),

    /// The raw value could not be coerced to the pipeline's feature kind
    #[error("expected {expected} input, got {found}")]
    WrongType { expected: FeatureKind, found: String },

    #[error("input must be a finite number, got {0}")]
    NonFinite(f32),

    /// The transformed vector does not fit the trained classifier
    #[error("feature vector has {actual} dimensions, classifier expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Rejected because of terms never seen at training time
    #[error("unknown terms: {}", .0.join(", "))]
    UnknownTerms(Vec<String>),

    /// The classifier produced an index the encoder cannot decode
    #[error("class index {0} has no label")]
    UnknownClass(usize),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    /// Malformed input, as opposed to input that parsed but failed validation.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            PredictError::MissingField(_) | PredictError::WrongType { .. } | PredictError::NonFinite(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_terms_message_lists_terms() {
        let err = PredictError::UnknownTerms(vec!["zorp".into(), "blarg".into()]);
        assert_eq!(err.to_string(), "unknown terms: zorp, blarg");
    }

    #[test]
    fn test_malformed_input_classification() {
        assert!(PredictError::MissingField("message".into()).is_malformed_input());
        assert!(PredictError::NonFinite(f32::NAN).is_malformed_input());
        assert!(!PredictError::DimensionMismatch { expected: 3, actual: 1 }.is_malformed_input());
        assert!(!PredictError::UnknownTerms(vec![]).is_malformed_input());
    }
}
