//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PhonemizerSettings::default()`]
//! 2. If `~/.dphon/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `DPHON_*` environment variable overrides (highest priority)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::PhonemizerSettings;

/// Resolve the path to the settings file (`~/.dphon/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".dphon").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PhonemizerSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<PhonemizerSettings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Defaults deep-merged with the file at `path`, without env overrides.
pub fn read_settings_file(path: &Path) -> Result<PhonemizerSettings> {
    let defaults = serde_json::to_value(PhonemizerSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `DPHON_*` environment variable overrides.
///
/// Invalid values are ignored with a warning and the file/default value stays.
pub fn apply_env_overrides(settings: &mut PhonemizerSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable source.
pub fn apply_overrides<F>(settings: &mut PhonemizerSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };

    // ── Model ───────────────────────────────────────────────────────
    if let Some(v) = env.string("DPHON_MODEL_DIR") {
        settings.model.dir = v;
    }
    if let Some(v) = env.string("DPHON_MODEL_FILE") {
        settings.model.model_file = v;
    }
    if let Some(v) = env.string("DPHON_TOKENIZER_FILE") {
        settings.model.tokenizer_file = v;
    }
    if let Some(v) = env.string("DPHON_HF_REPO") {
        settings.model.hf_repo = Some(v);
    }
    if let Some(v) = env.usize("DPHON_MIN_SEQ_LEN", 1, 4096) {
        settings.model.min_sequence_length = v;
    }
    if let Some(v) = env.usize("DPHON_INTRA_THREADS", 1, 256) {
        settings.model.intra_threads = v;
    }

    // ── Dictionaries ────────────────────────────────────────────────
    if let Some(v) = env.string("DPHON_DICT_DIR") {
        settings.dictionaries.dir = v;
    }
    if let Some(v) = env.string("DPHON_LANGUAGES") {
        settings.dictionaries.languages = v
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    // ── Pipeline ────────────────────────────────────────────────────
    if let Some(v) = env.string("DPHON_LANGUAGE") {
        settings.phonemize.default_language = v;
    }
    if let Some(v) = env.bool("DPHON_KEEP_PUNCTUATION") {
        settings.phonemize.keep_punctuation = v;
    }
    if let Some(v) = env.enumeration("DPHON_FALLBACK_MODE") {
        settings.phonemize.fallback_mode = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = env.string("DPHON_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = env.enumeration("DPHON_LOG_FORMAT") {
        settings.logging.format = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `usize` within an inclusive range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Variable readers ────────────────────────────────────────────────────────

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn bool(&self, name: &str) -> Option<bool> {
        let val = (self.lookup)(name)?;
        let result = parse_bool(&val);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
        }
        result
    }

    fn usize(&self, name: &str, min: usize, max: usize) -> Option<usize> {
        let val = (self.lookup)(name)?;
        let result = parse_usize_range(&val, min, max);
        if result.is_none() {
            tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
        }
        result
    }

    fn enumeration<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        let val = self.string(name)?;
        let parsed = serde_json::from_value(Value::String(val.to_lowercase())).ok();
        if parsed.is_none() {
            tracing::warn!(key = name, value = %val, "unknown variant in env var, ignoring");
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;
    use crate::types::{FallbackMode, LogFormat};

    fn overrides(pairs: &[(&str, &str)]) -> PhonemizerSettings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut settings = PhonemizerSettings::default();
        apply_overrides(&mut settings, |name| vars.get(name).cloned());
        settings
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"model": {"dir": "/a", "modelFile": "m.onnx"}});
        let source = serde_json::json!({"model": {"dir": "/b"}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["model"]["dir"], "/b");
        assert_eq!(merged["model"]["modelFile"], "m.onnx");
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"languages": ["de", "fr", "es"]});
        let source = serde_json::json!({"languages": ["en_us"]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["languages"], serde_json::json!(["en_us"]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        assert_eq!(deep_merge(target, source)["a"], 42);
    }

    // ── files ───────────────────────────────────────────────────────

    #[test]
    fn missing_file_returns_defaults() {
        let settings = read_settings_file(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.model.min_sequence_length, 64);
    }

    #[test]
    fn partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"model": {"hfRepo": "acme/dp", "intraThreads": 4}, "phonemize": {"keepPunctuation": true}}"#,
        )
        .unwrap();

        let settings = read_settings_file(&path).unwrap();
        assert_eq!(settings.model.hf_repo.as_deref(), Some("acme/dp"));
        assert_eq!(settings.model.intra_threads, 4);
        assert_eq!(settings.model.output_name, "output");
        assert!(settings.phonemize.keep_punctuation);
    }

    #[test]
    fn invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();
        assert!(matches!(
            read_settings_file(&path).unwrap_err(),
            SettingsError::Json(_)
        ));
    }

    // ── overrides ───────────────────────────────────────────────────

    #[test]
    fn override_strings_and_numbers() {
        let s = overrides(&[
            ("DPHON_MODEL_DIR", "/srv/models"),
            ("DPHON_MIN_SEQ_LEN", "128"),
            ("DPHON_LANGUAGE", "fr"),
            ("DPHON_LANGUAGES", "de, fr,,es"),
        ]);
        assert_eq!(s.model.dir, "/srv/models");
        assert_eq!(s.model.min_sequence_length, 128);
        assert_eq!(s.phonemize.default_language, "fr");
        assert_eq!(s.dictionaries.languages, vec!["de", "fr", "es"]);
    }

    #[test]
    fn override_enums_case_insensitive() {
        let s = overrides(&[
            ("DPHON_FALLBACK_MODE", "Concurrent"),
            ("DPHON_LOG_FORMAT", "JSON"),
        ]);
        assert_eq!(s.phonemize.fallback_mode, FallbackMode::Concurrent);
        assert_eq!(s.logging.format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_are_ignored() {
        let s = overrides(&[
            ("DPHON_MIN_SEQ_LEN", "0"),
            ("DPHON_INTRA_THREADS", "many"),
            ("DPHON_KEEP_PUNCTUATION", "maybe"),
            ("DPHON_FALLBACK_MODE", "parallel"),
            ("DPHON_MODEL_DIR", ""),
        ]);
        let d = PhonemizerSettings::default();
        assert_eq!(s.model.min_sequence_length, d.model.min_sequence_length);
        assert_eq!(s.model.intra_threads, d.model.intra_threads);
        assert!(!s.phonemize.keep_punctuation);
        assert_eq!(s.phonemize.fallback_mode, FallbackMode::Sequential);
        assert_eq!(s.model.dir, d.model.dir);
    }

    #[test]
    fn parse_bool_variants() {
        for v in ["true", "1", "YES", "on"] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["false", "0", "No", "off"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn parse_usize_bounds() {
        assert_eq!(parse_usize_range("64", 1, 4096), Some(64));
        assert_eq!(parse_usize_range("4097", 1, 4096), None);
        assert_eq!(parse_usize_range("-1", 1, 4096), None);
    }
}
