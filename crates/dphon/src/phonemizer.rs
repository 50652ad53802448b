//! Top-level phonemization pipeline.
//!
//! ```text
//! text → segment → per-token dictionary lookup / model fallback → reassemble
//! ```

use std::sync::Arc;

use dphon_settings::FallbackMode;
use futures::future::try_join_all;
use tracing::debug;

use crate::config::PhonemizerConfig;
use crate::dictionary::DictionaryStore;
use crate::engine::InferenceEngine;
use crate::errors::Result;
use crate::fallback::FallbackInvoker;
use crate::language::Language;
use crate::reassemble::reassemble;
use crate::resolve::{Resolution, Resolver};
use crate::segment::segment;
use crate::tokenizer::Tokenizer;

/// Dictionary-first phonemizer with a model fallback.
///
/// Built once and shared; nothing inside is mutated by [`phonemize`](Self::phonemize).
pub struct Phonemizer {
    resolver: Resolver,
    fallback_mode: FallbackMode,
}

impl Phonemizer {
    /// Assemble a phonemizer from ready collaborators.
    pub fn new(
        store: Arc<DictionaryStore>,
        tokenizer: Arc<dyn Tokenizer>,
        engine: Arc<dyn InferenceEngine>,
        config: PhonemizerConfig,
    ) -> Self {
        let fallback = FallbackInvoker::new(tokenizer, engine, config.fallback);
        Self {
            resolver: Resolver::new(store, fallback),
            fallback_mode: config.fallback_mode,
        }
    }

    /// Languages with a loaded dictionary.
    pub fn languages(&self) -> Vec<Language> {
        self.resolver.store().languages()
    }

    /// Transcribe `text` in `language`.
    ///
    /// Fails before touching the text if `language` has no dictionary. Any
    /// fallback failure aborts the whole call.
    pub async fn phonemize(
        &self,
        text: &str,
        language: Language,
        keep_punctuation: bool,
    ) -> Result<String> {
        let _ = self.resolver.store().dictionary(language)?;

        let tokens = segment(text);
        let entries = match self.fallback_mode {
            FallbackMode::Sequential => {
                let mut entries = Vec::with_capacity(tokens.len());
                for token in &tokens {
                    entries.push(
                        self.resolver
                            .resolve(token, language, keep_punctuation)
                            .await?,
                    );
                }
                entries
            }
            FallbackMode::Concurrent => {
                let resolutions = tokens
                    .iter()
                    .map(|t| self.resolver.classify(t, language, keep_punctuation))
                    .collect::<Result<Vec<_>>>()?;
                try_join_all(resolutions.into_iter().map(|r| async move {
                    match r {
                        Resolution::Ready(s) => Ok(s),
                        Resolution::Fallback(word) => self.resolver.fallback(&word, language).await,
                    }
                }))
                .await?
            }
        };

        debug!(%language, tokens = tokens.len(), "phonemized");
        Ok(reassemble(&entries))
    }

    /// Like [`phonemize`](Self::phonemize) with a language code such as `"en_us"`.
    pub async fn phonemize_code(
        &self,
        text: &str,
        language_code: &str,
        keep_punctuation: bool,
    ) -> Result<String> {
        let language: Language = language_code.parse()?;
        self.phonemize(text, language, keep_punctuation).await
    }
}

#[cfg(feature = "ort")]
impl Phonemizer {
    /// Build everything from settings: fetch missing assets, load the
    /// dictionaries, tokenizer and ONNX session.
    pub async fn from_settings(settings: &dphon_settings::PhonemizerSettings) -> Result<Self> {
        crate::model::ensure_assets(&settings.model).await?;

        let languages = crate::config::configured_languages(settings)?;
        let dict_dir = settings.dictionaries.resolved_dir();
        let store = tokio::task::spawn_blocking(move || {
            DictionaryStore::load_dir(&dict_dir, &languages)
        })
        .await
        .map_err(|e| crate::errors::PhonemizeError::AssetUnavailable(format!("join error: {e}")))??;

        let tokenizer = crate::tokenizer::SymbolTokenizer::from_file(&settings.model.tokenizer_path())?;
        let engine = crate::ort_engine::OrtEngine::load(&settings.model).await?;

        Ok(Self::new(
            Arc::new(store),
            Arc::new(tokenizer),
            Arc::new(engine),
            PhonemizerConfig::from_settings(settings),
        ))
    }
}
