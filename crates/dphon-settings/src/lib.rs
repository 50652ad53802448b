//! # dphon-settings
//!
//! Configuration for the deep phonemizer, loaded from three layers
//! (in priority order):
//! 1. **Compiled defaults**: [`PhonemizerSettings::default()`]
//! 2. **User file**: `~/.dphon/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `DPHON_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

static SETTINGS: OnceLock<PhonemizerSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// Loaded on first call; falls back to compiled defaults if loading fails.
pub fn get_settings() -> &'static PhonemizerSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// Returns the settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: PhonemizerSettings) -> std::result::Result<(), PhonemizerSettings> {
    SETTINGS.set(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = PhonemizerSettings::default();
        let path = settings_path();
        assert!(path.ends_with(".dphon/settings.json"));
    }
}
