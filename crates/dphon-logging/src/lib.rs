//! # dphon-logging
//!
//! `tracing` subscriber setup shared by the library consumers and the CLI.
//!
//! Output always goes to stderr so stdout stays reserved for transcriptions.
//! `RUST_LOG` takes precedence over the configured level.

#![deny(unsafe_code)]

use tracing_subscriber::EnvFilter;

/// Log level accepted in configuration and on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Detailed entry/exit points.
    Trace,
    /// Per-word fallback details.
    Debug,
    /// Asset and model loading.
    Info,
    /// Ignored configuration values.
    Warn,
    /// Failures.
    Error,
}

impl LogLevel {
    /// Convert from string (case-insensitive); unknown values map to `Warn`.
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "error" => Self::Error,
            _ => Self::Warn,
        }
    }

    /// Directive string for [`EnvFilter`].
    #[must_use]
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_directive())
    }
}

/// Initialize the global tracing subscriber on stderr.
///
/// Call once at startup; later calls are no-ops.
///
/// * `level` - minimum level when `RUST_LOG` is unset.
/// * `json` - emit one JSON object per event instead of compact lines.
pub fn init_subscriber(level: LogLevel, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // try_init fails if a global subscriber is already set
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}
