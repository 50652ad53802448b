//! Inference seam between the pipeline and the scoring model.

use std::collections::HashMap;

use async_trait::async_trait;
use ndarray::Array3;

use crate::errors::Result;

/// Per-position, per-symbol scores shaped `[batch, sequence_length, vocabulary_size]`.
pub type ScoreMatrix = Array3<f32>;

/// Named int64 input of shape `[1, ids.len()]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputTensor {
    /// Model input name.
    pub name: String,
    /// Row of ids (batch size 1).
    pub ids: Vec<i64>,
}

/// Outputs of one inference request, keyed by output name.
pub type NamedOutputs = HashMap<String, ScoreMatrix>;

/// A ready-to-query model session.
///
/// Implementations are shared read-only across calls; one `run` is one
/// request.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Submit one request and wait for its outputs.
    async fn run(&self, input: InputTensor) -> Result<NamedOutputs>;
}
