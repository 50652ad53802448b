//! Phonemization error types.
//!
//! Every error is fatal for the call that produced it: a `phonemize` call
//! either returns the whole transcription or one of these.

use thiserror::Error;

use crate::language::Language;

/// Errors from phonemization and its collaborators.
#[derive(Debug, Error)]
pub enum PhonemizeError {
    /// Language code outside the supported set.
    #[error("unknown language code: {0}")]
    UnknownLanguage(String),

    /// Supported language without a loaded dictionary.
    #[error("no dictionary loaded for language {0}")]
    LanguageNotConfigured(Language),

    /// Tokenizer could not encode the input.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Inference response lacks the named score-matrix output.
    #[error("model response has no output named {0:?}")]
    MissingOutput(String),

    /// Score-matrix output has the wrong shape.
    #[error("invalid model output: {0}")]
    InvalidOutput(String),

    /// Inference session creation or run failure.
    #[error("inference error: {0}")]
    Inference(String),

    /// Model, tokenizer or dictionary file unavailable.
    #[error("asset unavailable: {0}")]
    AssetUnavailable(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON asset.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PhonemizeError {
    /// Whether the error comes from the requested language rather than from
    /// a collaborator.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownLanguage(_) | Self::LanguageNotConfigured(_))
    }
}

/// Result alias for phonemization.
pub type Result<T> = std::result::Result<T, PhonemizeError>;

/// Attach context to foreign errors as [`PhonemizeError::Inference`].
pub trait ResultExt<T> {
    /// Map the error into `Inference("{context}: {err}")`.
    fn inference(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn inference(self, context: &str) -> Result<T> {
        self.map_err(|e| PhonemizeError::Inference(format!("{context}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let cases = vec![
            (
                PhonemizeError::UnknownLanguage("xx".into()),
                "unknown language code: xx",
            ),
            (
                PhonemizeError::LanguageNotConfigured(Language::De),
                "no dictionary loaded for language de",
            ),
            (
                PhonemizeError::MissingOutput("output".into()),
                "model response has no output named \"output\"",
            ),
            (
                PhonemizeError::AssetUnavailable("model.onnx".into()),
                "asset unavailable: model.onnx",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn configuration_classification() {
        assert!(PhonemizeError::UnknownLanguage("xx".into()).is_configuration());
        assert!(PhonemizeError::LanguageNotConfigured(Language::Fr).is_configuration());
        assert!(!PhonemizeError::MissingOutput("output".into()).is_configuration());
        assert!(!PhonemizeError::Inference("boom".into()).is_configuration());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PhonemizeError>();
    }

    #[test]
    fn result_ext_adds_context() {
        let r: std::result::Result<(), &str> = Err("closed");
        let err = r.inference("session run").unwrap_err();
        assert_eq!(err.to_string(), "inference error: session run: closed");
    }
}
