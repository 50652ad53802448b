//! Per-language pronunciation dictionaries.
//!
//! A [`DictionaryStore`] is built once and only read afterwards. Each
//! language maps a lowercase word to its phoneme string; lookups are exact
//! matches on the lowercased word.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::{PhonemizeError, Result};
use crate::language::Language;

/// Word → phoneme mapping for one language.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    entries: HashMap<String, String>,
}

impl Dictionary {
    /// Build from `(word, phonemes)` pairs. Words are lowercased.
    ///
    /// When case variants collide, an already lowercase spelling wins;
    /// otherwise the first variant in iteration order is kept.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        // (phonemes, came from an exact lowercase key)
        let mut map: HashMap<String, (String, bool)> = HashMap::new();
        for (word, phonemes) in entries {
            let word = word.as_ref();
            let key = word.to_lowercase();
            let exact = key == word;
            match map.entry(key) {
                Entry::Vacant(e) => {
                    let _ = e.insert((phonemes.into(), exact));
                }
                Entry::Occupied(mut e) if exact && !e.get().1 => {
                    let _ = e.insert((phonemes.into(), true));
                }
                Entry::Occupied(_) => {}
            }
        }
        Self {
            entries: map.into_iter().map(|(k, (v, _))| (k, v)).collect(),
        }
    }

    /// Parse a flat JSON object `{"word": "phonemes", ...}`, keeping file
    /// order for case-variant resolution.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|(word, value)| -> Result<(String, String)> {
                Ok((word, serde_json::from_value(value)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_entries(entries))
    }

    /// Phonemes for an already lowercased word.
    ///
    /// Empty entries count as absent so the word goes to the model.
    pub fn get(&self, lowercase_word: &str) -> Option<&str> {
        self.entries
            .get(lowercase_word)
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable set of dictionaries keyed by language.
#[derive(Clone, Debug, Default)]
pub struct DictionaryStore {
    dictionaries: HashMap<Language, Dictionary>,
}

impl DictionaryStore {
    /// Build from in-memory dictionaries.
    pub fn from_dictionaries(dictionaries: impl IntoIterator<Item = (Language, Dictionary)>) -> Self {
        Self {
            dictionaries: dictionaries.into_iter().collect(),
        }
    }

    /// Load `<dir>/<code>.json` for each requested language.
    pub fn load_dir(dir: &Path, languages: &[Language]) -> Result<Self> {
        let mut dictionaries = HashMap::with_capacity(languages.len());
        for &language in languages {
            let path = dir.join(format!("{}.json", language.code()));
            let content = std::fs::read_to_string(&path).map_err(|e| {
                PhonemizeError::AssetUnavailable(format!(
                    "dictionary {}: {e}",
                    path.display()
                ))
            })?;
            let dictionary = Dictionary::from_json(&content)?;
            debug!(%language, entries = dictionary.len(), "loaded dictionary");
            let _ = dictionaries.insert(language, dictionary);
        }
        info!(
            dir = %dir.display(),
            languages = dictionaries.len(),
            "dictionaries ready"
        );
        Ok(Self { dictionaries })
    }

    /// Dictionary for `language`, or a configuration error if none was loaded.
    pub fn dictionary(&self, language: Language) -> Result<&Dictionary> {
        self.dictionaries
            .get(&language)
            .ok_or(PhonemizeError::LanguageNotConfigured(language))
    }

    /// Look up an already lowercased word.
    pub fn lookup(&self, language: Language, lowercase_word: &str) -> Result<Option<&str>> {
        Ok(self.dictionary(language)?.get(lowercase_word))
    }

    /// Whether a dictionary is loaded for `language`.
    pub fn contains(&self, language: Language) -> bool {
        self.dictionaries.contains_key(&language)
    }

    /// Loaded languages, sorted.
    pub fn languages(&self) -> Vec<Language> {
        let mut langs: Vec<Language> = self.dictionaries.keys().copied().collect();
        langs.sort();
        langs
    }
}
