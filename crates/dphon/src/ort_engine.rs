//! ONNX Runtime inference engine (feature-gated behind `ort`).
//!
//! Holds one session behind a mutex since `Session::run` requires `&mut self`.
//! Session creation and every run happen on `spawn_blocking`.
#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::cast_possible_truncation)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dphon_settings::ModelSettings;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::engine::{InferenceEngine, InputTensor, NamedOutputs, ScoreMatrix};
use crate::errors::{PhonemizeError, Result, ResultExt};

/// Inference engine backed by a local ONNX model file.
pub struct OrtEngine {
    session: Arc<Mutex<Session>>,
    output_name: String,
}

impl OrtEngine {
    /// Load the session described by `settings`.
    pub async fn load(settings: &ModelSettings) -> Result<Self> {
        let path = settings.model_path();
        let threads = settings.intra_threads;
        let session = tokio::task::spawn_blocking(move || load_session(&path, threads))
            .await
            .inference("task join")??;
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            output_name: settings.output_name.clone(),
        })
    }
}

fn load_session(path: &Path, intra_threads: usize) -> Result<Session> {
    if !path.exists() {
        return Err(PhonemizeError::AssetUnavailable(format!(
            "model file not found: {}",
            path.display()
        )));
    }
    info!(model = %path.display(), intra_threads, "loading ONNX model");

    let session = Session::builder()
        .inference("session builder")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .inference("optimization level")?
        .with_memory_pattern(true)
        .inference("memory pattern")?
        .with_parallel_execution(false)
        .inference("execution mode")?
        .with_intra_threads(intra_threads)
        .inference("set threads")?
        .commit_from_file(path)
        .inference("load model")?;

    debug!("session ready");
    Ok(session)
}

fn run_session(
    session: &mut Session,
    input: InputTensor,
    output_name: &str,
) -> Result<NamedOutputs> {
    let len = input.ids.len();
    let tensor = Tensor::from_array(([1i64, len as i64], input.ids)).inference("input tensor")?;
    let outputs = session
        .run(ort::inputs![input.name.as_str() => tensor])
        .inference("run")?;

    let mut named = NamedOutputs::new();
    let Some(value) = outputs.get(output_name) else {
        return Ok(named);
    };
    let (shape, data) = value.try_extract_tensor::<f32>().inference("extract tensor")?;
    let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
    let &[batch, seq, vocab] = dims.as_slice() else {
        return Err(PhonemizeError::InvalidOutput(format!(
            "expected rank-3 output, got shape {dims:?}"
        )));
    };
    let scores = ScoreMatrix::from_shape_vec((batch, seq, vocab), data.to_vec())
        .map_err(|e| PhonemizeError::InvalidOutput(e.to_string()))?;
    let _ = named.insert(output_name.to_string(), scores);
    Ok(named)
}

#[async_trait]
impl InferenceEngine for OrtEngine {
    async fn run(&self, input: InputTensor) -> Result<NamedOutputs> {
        let session = Arc::clone(&self.session);
        let output_name = self.output_name.clone();
        tokio::task::spawn_blocking(move || run_session(&mut session.lock(), input, &output_name))
            .await
            .inference("inference task")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_missing_model_is_asset_error() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = ModelSettings {
            dir: tmp.path().to_string_lossy().into_owned(),
            ..ModelSettings::default()
        };
        let err = OrtEngine::load(&settings).await.err().unwrap();
        assert!(matches!(err, PhonemizeError::AssetUnavailable(_)));
    }
}
