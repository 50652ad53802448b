//! Pipeline configuration derived from settings.

use dphon_settings::{FallbackMode, PhonemizerSettings};

use crate::errors::Result;
use crate::fallback::FallbackConfig;
use crate::language::Language;

/// Runtime configuration for a [`Phonemizer`](crate::Phonemizer).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhonemizerConfig {
    /// Model input/output names and padding.
    pub fallback: FallbackConfig,
    /// Scheduling of fallback requests within one call.
    pub fallback_mode: FallbackMode,
}

impl PhonemizerConfig {
    /// Create config from settings.
    pub fn from_settings(s: &PhonemizerSettings) -> Self {
        Self {
            fallback: FallbackConfig {
                input_name: s.model.input_name.clone(),
                output_name: s.model.output_name.clone(),
                min_sequence_length: s.model.min_sequence_length,
            },
            fallback_mode: s.phonemize.fallback_mode,
        }
    }
}

/// Parse the configured dictionary languages. An unknown code is an error.
pub fn configured_languages(s: &PhonemizerSettings) -> Result<Vec<Language>> {
    s.dictionaries
        .languages
        .iter()
        .map(|code| code.parse())
        .collect()
}

/// Parse the configured default language.
pub fn default_language(s: &PhonemizerSettings) -> Result<Language> {
    s.phonemize.default_language.parse()
}
