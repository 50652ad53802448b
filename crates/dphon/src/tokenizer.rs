//! Text ↔ id conversion for the fallback model.
//!
//! [`Tokenizer`] is the seam the pipeline depends on. [`SymbolTokenizer`] is
//! the concrete character-level implementation used with the exported model.
//!
//! Both sides of a [`SymbolTokenizer`] share one index layout:
//!
//! ```text
//! 0            pad
//! 1..=L        one <lang> token per language, in table order
//! L + 1        <end>
//! L + 2..      symbols, in table order
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{PhonemizeError, Result};
use crate::language::Language;

/// Model vocabulary id.
pub type TokenId = u32;

/// Id used to right-pad model input.
pub const PAD_ID: TokenId = 0;

/// Encoder/decoder pair for the fallback model.
pub trait Tokenizer: Send + Sync {
    /// Encode a lowercase word for `language` into input ids.
    fn encode(&self, text: &str, language: Language) -> Result<Vec<TokenId>>;

    /// Decode output ids into a phoneme string.
    fn decode(&self, ids: &[TokenId]) -> String;
}

/// On-disk symbol table.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTable {
    /// Input-side characters.
    pub text_symbols: Vec<String>,
    /// Output-side phoneme symbols.
    pub phoneme_symbols: Vec<String>,
    /// Language codes with a start token, in index order.
    pub languages: Vec<Language>,
    /// How many times each input character is repeated.
    #[serde(default = "default_char_repeats")]
    pub char_repeats: usize,
    /// Joins decoded phoneme symbols.
    #[serde(default)]
    pub separator: String,
}

fn default_char_repeats() -> usize {
    1
}

/// Character-level tokenizer with language start tokens and an end token.
#[derive(Clone, Debug)]
pub struct SymbolTokenizer {
    text_index: HashMap<String, TokenId>,
    language_index: HashMap<Language, TokenId>,
    phoneme_by_id: HashMap<TokenId, String>,
    end_id: TokenId,
    char_repeats: usize,
    separator: String,
}

impl SymbolTokenizer {
    /// Build index maps from a symbol table.
    pub fn new(table: SymbolTable) -> Result<Self> {
        if table.char_repeats == 0 {
            return Err(PhonemizeError::Tokenizer("charRepeats must be at least 1".into()));
        }
        let end_id = to_id(table.languages.len() + 1)?;
        let first_symbol = table.languages.len() + 2;

        let language_index = table
            .languages
            .iter()
            .enumerate()
            .map(|(i, &lang)| Ok((lang, to_id(i + 1)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        let text_index = table
            .text_symbols
            .into_iter()
            .enumerate()
            .map(|(i, sym)| Ok((sym, to_id(first_symbol + i)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        let phoneme_by_id = table
            .phoneme_symbols
            .into_iter()
            .enumerate()
            .map(|(i, sym)| Ok((to_id(first_symbol + i)?, sym)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            text_index,
            language_index,
            phoneme_by_id,
            end_id,
            char_repeats: table.char_repeats,
            separator: table.separator,
        })
    }

    /// Load a JSON symbol table.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PhonemizeError::AssetUnavailable(format!("tokenizer {}: {e}", path.display()))
        })?;
        let table: SymbolTable = serde_json::from_str(&content)?;
        let tokenizer = Self::new(table)?;
        info!(
            path = %path.display(),
            text_symbols = tokenizer.text_index.len(),
            phoneme_symbols = tokenizer.phoneme_by_id.len(),
            "tokenizer loaded"
        );
        Ok(tokenizer)
    }

    /// Id of the `<end>` token.
    pub fn end_id(&self) -> TokenId {
        self.end_id
    }

    fn is_special(&self, id: TokenId) -> bool {
        id == PAD_ID || id == self.end_id || self.language_index.values().any(|&l| l == id)
    }
}

fn to_id(index: usize) -> Result<TokenId> {
    TokenId::try_from(index)
        .map_err(|_| PhonemizeError::Tokenizer(format!("symbol index {index} out of range")))
}

impl Tokenizer for SymbolTokenizer {
    /// `<lang>`, each known character `char_repeats` times, `<end>`.
    /// Characters missing from the table are skipped.
    fn encode(&self, text: &str, language: Language) -> Result<Vec<TokenId>> {
        let start = *self.language_index.get(&language).ok_or_else(|| {
            PhonemizeError::Tokenizer(format!("no start token for language {language}"))
        })?;

        let mut ids = Vec::with_capacity(text.len() * self.char_repeats + 2);
        ids.push(start);
        let mut buf = [0u8; 4];
        for c in text.chars() {
            if let Some(&id) = self.text_index.get(&*c.encode_utf8(&mut buf)) {
                ids.extend(std::iter::repeat_n(id, self.char_repeats));
            }
        }
        ids.push(self.end_id);
        Ok(ids)
    }

    /// Stops at `<end>`, collapses repeated ids and drops special or unknown ids.
    fn decode(&self, ids: &[TokenId]) -> String {
        let mut symbols: Vec<&str> = Vec::new();
        let mut prev: Option<TokenId> = None;
        for &id in ids {
            if id == self.end_id {
                break;
            }
            if prev == Some(id) {
                continue;
            }
            prev = Some(id);
            if self.is_special(id) {
                continue;
            }
            if let Some(sym) = self.phoneme_by_id.get(&id) {
                symbols.push(sym);
            }
        }
        symbols.join(&self.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // pad=0, <en_us>=1, <de>=2, <end>=3, symbols from 4
    fn table() -> SymbolTable {
        SymbolTable {
            text_symbols: vec!["a".into(), "b".into(), "c".into()],
            phoneme_symbols: vec!["æ".into(), "b".into(), "k".into()],
            languages: vec![Language::EnUs, Language::De],
            char_repeats: 1,
            separator: String::new(),
        }
    }

    #[test]
    fn encode_wraps_with_language_and_end() {
        let t = SymbolTokenizer::new(table()).unwrap();
        assert_eq!(t.encode("cab", Language::EnUs).unwrap(), vec![1, 6, 4, 5, 3]);
        assert_eq!(t.encode("a", Language::De).unwrap(), vec![2, 4, 3]);
    }

    #[test]
    fn encode_skips_unknown_chars() {
        let t = SymbolTokenizer::new(table()).unwrap();
        assert_eq!(t.encode("a-z", Language::EnUs).unwrap(), vec![1, 4, 3]);
    }

    #[test]
    fn encode_repeats_chars() {
        let t = SymbolTokenizer::new(SymbolTable {
            char_repeats: 3,
            ..table()
        })
        .unwrap();
        assert_eq!(
            t.encode("ab", Language::EnUs).unwrap(),
            vec![1, 4, 4, 4, 5, 5, 5, 3]
        );
    }

    #[test]
    fn encode_unknown_language_fails() {
        let t = SymbolTokenizer::new(table()).unwrap();
        let err = t.encode("a", Language::Fr).unwrap_err();
        assert!(matches!(err, PhonemizeError::Tokenizer(_)));
    }

    #[test]
    fn decode_collapses_and_drops_specials() {
        let t = SymbolTokenizer::new(table()).unwrap();
        assert_eq!(t.decode(&[1, 6, 6, 0, 4, 4, 5, 3, 6]), "kæb");
    }

    #[test]
    fn decode_pad_separates_real_repeats() {
        let t = SymbolTokenizer::new(table()).unwrap();
        assert_eq!(t.decode(&[4, 0, 4]), "ææ");
    }

    #[test]
    fn decode_ignores_out_of_table_ids() {
        let t = SymbolTokenizer::new(table()).unwrap();
        assert_eq!(t.decode(&[4, 99, 5]), "æb");
    }

    #[test]
    fn decode_joins_with_separator() {
        let t = SymbolTokenizer::new(SymbolTable {
            separator: "-".into(),
            ..table()
        })
        .unwrap();
        assert_eq!(t.decode(&[6, 4, 5]), "k-æ-b");
        assert_eq!(t.decode(&[0, 0, 0]), "");
    }

    #[test]
    fn zero_char_repeats_rejected() {
        let err = SymbolTokenizer::new(SymbolTable {
            char_repeats: 0,
            ..table()
        })
        .unwrap_err();
        assert!(matches!(err, PhonemizeError::Tokenizer(_)));
    }

    #[test]
    fn from_file_reads_camel_case_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokenizer.json");
        std::fs::write(
            &path,
            r#"{"textSymbols": ["h", "i"], "phonemeSymbols": ["h", "aɪ"], "languages": ["en_us"], "separator": " "}"#,
        )
        .unwrap();
        let t = SymbolTokenizer::from_file(&path).unwrap();
        assert_eq!(t.end_id(), 2);
        assert_eq!(t.encode("hi", Language::EnUs).unwrap(), vec![1, 3, 4, 2]);
        assert_eq!(t.decode(&[3, 4, 2]), "h aɪ");
    }

    #[test]
    fn from_file_missing_is_asset_error() {
        let err = SymbolTokenizer::from_file(Path::new("/nonexistent/tokenizer.json")).unwrap_err();
        assert!(matches!(err, PhonemizeError::AssetUnavailable(_)));
    }
}
