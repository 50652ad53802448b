//! # dphon
//!
//! Command-line phonemizer: prints the IPA transcription of its argument, or
//! of each stdin line when no argument is given.

#![deny(unsafe_code)]

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dphon::{Language, Phonemizer};
use dphon_logging::LogLevel;
use dphon_settings::{FallbackMode, LogFormat, PhonemizerSettings};

/// Deep phonemizer.
#[derive(Parser, Debug)]
#[command(name = "dphon", about = "Transcribe text to phonemes")]
struct Cli {
    /// Text to transcribe. Reads stdin line by line when omitted.
    text: Option<String>,

    /// Language code (`en_us`, `en_uk`, `de`, `fr`, `es`).
    #[arg(short, long)]
    lang: Option<String>,

    /// Keep punctuation in the output.
    #[arg(short = 'p', long)]
    keep_punctuation: bool,

    /// Settings file (defaults to `~/.dphon/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Directory holding the model and tokenizer files.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Directory holding `<lang>.json` dictionaries.
    #[arg(long)]
    dict_dir: Option<PathBuf>,

    /// Run fallback requests for one input concurrently.
    #[arg(long)]
    concurrent: bool,

    /// Log level (overrides settings).
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON logs on stderr.
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    /// Fold command-line overrides into loaded settings.
    fn apply(&self, settings: &mut PhonemizerSettings) {
        if let Some(dir) = &self.model_dir {
            settings.model.dir = dir.to_string_lossy().into_owned();
        }
        if let Some(dir) = &self.dict_dir {
            settings.dictionaries.dir = dir.to_string_lossy().into_owned();
        }
        if let Some(lang) = &self.lang {
            settings.phonemize.default_language.clone_from(lang);
        }
        if self.keep_punctuation {
            settings.phonemize.keep_punctuation = true;
        }
        if self.concurrent {
            settings.phonemize.fallback_mode = FallbackMode::Concurrent;
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        if self.json_logs {
            settings.logging.format = LogFormat::Json;
        }
    }
}

/// Install `settings` as the process-wide settings and return them.
///
/// Keeps whatever was installed first if called twice.
fn install_settings(settings: PhonemizerSettings) -> &'static PhonemizerSettings {
    if dphon_settings::init_settings(settings).is_err() {
        tracing::warn!("settings already initialized, keeping existing values");
    }
    dphon_settings::get_settings()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(dphon_settings::settings_path);
    let mut settings = dphon_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    args.apply(&mut settings);
    let settings = install_settings(settings);

    dphon_logging::init_subscriber(
        LogLevel::from_str_lossy(&settings.logging.level),
        settings.logging.format == LogFormat::Json,
    );

    let language: Language =
        dphon::config::default_language(settings).context("Invalid language")?;
    let keep_punctuation = settings.phonemize.keep_punctuation;

    let phonemizer = Phonemizer::from_settings(settings)
        .await
        .context("Failed to initialize phonemizer")?;
    tracing::info!(%language, keep_punctuation, "phonemizer ready");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Some(text) = &args.text {
        let phonemes = phonemizer.phonemize(text, language, keep_punctuation).await?;
        writeln!(out, "{phonemes}")?;
    } else {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("Failed to read stdin")?;
            let phonemes = phonemizer
                .phonemize(&line, language, keep_punctuation)
                .await?;
            writeln!(out, "{phonemes}")?;
        }
    }
    out.flush()?;
    Ok(())
}
