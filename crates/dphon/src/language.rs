//! Supported languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PhonemizeError;

/// A language with its own dictionary and tokenizer start token.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Language {
    /// British English.
    #[serde(rename = "en_uk")]
    EnUk,
    /// American English.
    #[default]
    #[serde(rename = "en_us")]
    EnUs,
    /// German.
    #[serde(rename = "de")]
    De,
    /// French.
    #[serde(rename = "fr")]
    Fr,
    /// Spanish.
    #[serde(rename = "es")]
    Es,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Self; 5] = [Self::EnUk, Self::EnUs, Self::De, Self::Fr, Self::Es];

    /// Canonical code, also the dictionary file stem.
    pub const fn code(self) -> &'static str {
        match self {
            Self::EnUk => "en_uk",
            Self::EnUs => "en_us",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = PhonemizeError;

    /// Case-insensitive; `en-US` is accepted for `en_us`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == normalized)
            .ok_or_else(|| PhonemizeError::UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_codes() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn parse_is_lenient_about_case_and_dash() {
        assert_eq!("EN-us".parse::<Language>().unwrap(), Language::EnUs);
        assert_eq!(" De ".parse::<Language>().unwrap(), Language::De);
    }

    #[test]
    fn parse_unknown_is_configuration_error() {
        let err = "pt_br".parse::<Language>().unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, PhonemizeError::UnknownLanguage(code) if code == "pt_br"));
    }

    #[test]
    fn serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::EnUk).unwrap(), "\"en_uk\"");
        let lang: Language = serde_json::from_str("\"es\"").unwrap();
        assert_eq!(lang, Language::Es);
    }

    #[test]
    fn default_is_american_english() {
        assert_eq!(Language::default(), Language::EnUs);
    }
}
