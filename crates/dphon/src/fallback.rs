//! Model fallback for words missing from the dictionary.

use std::sync::Arc;

use tracing::debug;

use crate::decode::{greedy_decode, pad_ids};
use crate::engine::{InferenceEngine, InputTensor};
use crate::errors::{PhonemizeError, Result};
use crate::language::Language;
use crate::tokenizer::Tokenizer;

/// Input/output names and padding for the fallback model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackConfig {
    /// Name of the id input.
    pub input_name: String,
    /// Name of the score-matrix output.
    pub output_name: String,
    /// Inputs shorter than this are right-padded with id 0.
    pub min_sequence_length: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            input_name: "text".to_string(),
            output_name: "output".to_string(),
            min_sequence_length: 64,
        }
    }
}

/// Turns one out-of-vocabulary word into phonemes with a single model request.
pub struct FallbackInvoker {
    tokenizer: Arc<dyn Tokenizer>,
    engine: Arc<dyn InferenceEngine>,
    config: FallbackConfig,
}

impl FallbackInvoker {
    /// Create an invoker over shared collaborators.
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        engine: Arc<dyn InferenceEngine>,
        config: FallbackConfig,
    ) -> Self {
        Self {
            tokenizer,
            engine,
            config,
        }
    }

    /// Phonemize a lowercase word: encode, pad, one request, greedy decode,
    /// detokenize. No retry.
    pub async fn phonemize_word(&self, word: &str, language: Language) -> Result<String> {
        let ids = self.tokenizer.encode(word, language)?;
        let encoded_len = ids.len();
        let ids = pad_ids(ids, self.config.min_sequence_length);

        let input = InputTensor {
            name: self.config.input_name.clone(),
            ids: ids.into_iter().map(i64::from).collect(),
        };
        let mut outputs = self.engine.run(input).await?;
        let scores = outputs
            .remove(&self.config.output_name)
            .ok_or_else(|| PhonemizeError::MissingOutput(self.config.output_name.clone()))?;

        let decoded = greedy_decode(&scores)?;
        let phonemes = self.tokenizer.decode(&decoded);
        debug!(
            word,
            %language,
            encoded_len,
            output_shape = ?scores.shape(),
            phonemes = %phonemes,
            "fallback phonemized"
        );
        Ok(phonemes)
    }
}
