//! Per-token resolution: dictionary first, model fallback on a miss.

use std::sync::Arc;

use crate::dictionary::DictionaryStore;
use crate::errors::Result;
use crate::fallback::FallbackInvoker;
use crate::language::Language;
use crate::segment::Token;

/// What a token resolves to before any model call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Dictionary phonemes, pass-through punctuation or an empty placeholder.
    Ready(String),
    /// Lowercased word that needs the model.
    Fallback(String),
}

/// Dictionary lookup with model fallback.
pub struct Resolver {
    store: Arc<DictionaryStore>,
    fallback: FallbackInvoker,
}

impl Resolver {
    /// Create a resolver over a shared store.
    pub fn new(store: Arc<DictionaryStore>, fallback: FallbackInvoker) -> Self {
        Self { store, fallback }
    }

    /// The dictionary store.
    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    /// Resolve one token, awaiting the model on a dictionary miss.
    pub async fn resolve(
        &self,
        token: &Token<'_>,
        language: Language,
        keep_punctuation: bool,
    ) -> Result<String> {
        match self.classify(token, language, keep_punctuation)? {
            Resolution::Ready(s) => Ok(s),
            Resolution::Fallback(word) => self.fallback(&word, language).await,
        }
    }

    /// Everything [`resolve`](Self::resolve) does short of calling the model.
    pub fn classify(
        &self,
        token: &Token<'_>,
        language: Language,
        keep_punctuation: bool,
    ) -> Result<Resolution> {
        match token {
            Token::Word(word) => {
                let lower = word.to_lowercase();
                Ok(match self.store.lookup(language, &lower)? {
                    Some(phonemes) => Resolution::Ready(phonemes.to_string()),
                    None => Resolution::Fallback(lower),
                })
            }
            Token::Punctuation(c) if keep_punctuation => Ok(Resolution::Ready(c.to_string())),
            Token::Punctuation(_) => Ok(Resolution::Ready(String::new())),
        }
    }

    /// Run the model for an already lowercased word.
    pub async fn fallback(&self, lowercase_word: &str, language: Language) -> Result<String> {
        self.fallback.phonemize_word(lowercase_word, language).await
    }
}
