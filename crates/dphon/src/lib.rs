//! # dphon
//!
//! Grapheme-to-phoneme transcription for `en_us`, `en_uk`, `de`, `fr` and `es`.
//!
//! Words are looked up in a per-language pronunciation dictionary; anything
//! missing goes through a character-level model with greedy decoding:
//!
//! ```text
//! text ─ segment ─┬─ word ── dictionary hit ───────────────┐
//!                 │        └ miss ─ encode ─ pad ─ run ─ argmax ─ decode ─┤
//!                 └─ punctuation ─ keep / placeholder ─────┴─ reassemble
//! ```
//!
//! The model and tokenizer sit behind the [`InferenceEngine`] and
//! [`Tokenizer`] traits. The ONNX Runtime engine and `HuggingFace` asset
//! download are feature-gated behind `ort`.

#![deny(unsafe_code)]

pub mod config;
pub mod decode;
pub mod dictionary;
pub mod engine;
pub mod errors;
pub mod fallback;
pub mod language;
#[cfg(feature = "ort")]
pub mod model;
#[cfg(feature = "ort")]
pub mod ort_engine;
pub mod phonemizer;
pub mod reassemble;
pub mod resolve;
pub mod segment;
pub mod tokenizer;

pub use config::PhonemizerConfig;
pub use dictionary::{Dictionary, DictionaryStore};
pub use dphon_settings::FallbackMode;
pub use engine::{InferenceEngine, InputTensor, NamedOutputs, ScoreMatrix};
pub use errors::{PhonemizeError, Result};
pub use language::Language;
#[cfg(feature = "ort")]
pub use ort_engine::OrtEngine;
pub use phonemizer::Phonemizer;
pub use segment::Token;
pub use tokenizer::{SymbolTable, SymbolTokenizer, TokenId, Tokenizer};
