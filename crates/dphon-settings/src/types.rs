//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a partial
//! JSON file only needs the keys it overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// ```json
/// {
///   "model": { "dir": "/opt/models", "hfRepo": "acme/deep-phonemizer" },
///   "phonemize": { "defaultLanguage": "de", "keepPunctuation": true }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhonemizerSettings {
    /// Model and tokenizer assets.
    pub model: ModelSettings,
    /// Pronunciation dictionaries.
    pub dictionaries: DictionarySettings,
    /// Pipeline behavior.
    pub phonemize: PhonemizeSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Where the scoring model lives and how its session is configured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelSettings {
    /// Directory holding the model and tokenizer files (may contain `~`).
    pub dir: String,
    /// ONNX model filename inside `dir`.
    pub model_file: String,
    /// Symbol table filename inside `dir`.
    pub tokenizer_file: String,
    /// `HuggingFace` repository to fetch missing files from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hf_repo: Option<String>,
    /// Name of the int64 id input.
    pub input_name: String,
    /// Name of the score-matrix output.
    pub output_name: String,
    /// Input sequences shorter than this are right-padded with id 0.
    pub min_sequence_length: usize,
    /// Intra-op thread count for the inference session.
    pub intra_threads: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            dir: "~/.dphon/models".to_string(),
            model_file: "deep-phonemizer.onnx".to_string(),
            tokenizer_file: "tokenizer.json".to_string(),
            hf_repo: None,
            input_name: "text".to_string(),
            output_name: "output".to_string(),
            min_sequence_length: 64,
            intra_threads: 1,
        }
    }
}

impl ModelSettings {
    /// Model directory with `~/` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        expand_home(&self.dir)
    }

    /// Full path of the ONNX model.
    pub fn model_path(&self) -> PathBuf {
        self.resolved_dir().join(&self.model_file)
    }

    /// Full path of the tokenizer symbol table.
    pub fn tokenizer_path(&self) -> PathBuf {
        self.resolved_dir().join(&self.tokenizer_file)
    }
}

/// Dictionary location and the languages to load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionarySettings {
    /// Directory holding `<code>.json` files (may contain `~`).
    pub dir: String,
    /// Language codes to load at startup.
    pub languages: Vec<String>,
}

impl Default for DictionarySettings {
    fn default() -> Self {
        Self {
            dir: "~/.dphon/dictionaries".to_string(),
            languages: ["en_uk", "en_us", "de", "fr", "es"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl DictionarySettings {
    /// Dictionary directory with `~/` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        expand_home(&self.dir)
    }
}

/// How out-of-vocabulary words reach the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// One request at a time, in token order.
    #[default]
    Sequential,
    /// All requests of a call in flight together, reassembled in token order.
    Concurrent,
}

/// Pipeline defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhonemizeSettings {
    /// Language used when the caller does not pick one.
    pub default_language: String,
    /// Emit punctuation characters instead of empty placeholders.
    pub keep_punctuation: bool,
    /// Scheduling of fallback inference requests.
    pub fallback_mode: FallbackMode,
}

impl Default for PhonemizeSettings {
    fn default() -> Self {
        Self {
            default_language: "en_us".to_string(),
            keep_punctuation: false,
            fallback_mode: FallbackMode::Sequential,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single line.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level (`trace`..`error`).
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Expand a leading `~/` to `$HOME`.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
