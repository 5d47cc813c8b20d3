// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs a sentence transformer (all-MiniLM-L6-v2 by default) through ONNX
//! Runtime:
//! - ONNX model loading from disk, validated with a probe inference
//! - BERT tokenization with truncation to `max_length`
//! - Mean pooling over token embeddings, weighted by the attention mask
//! - A small pool of sessions handed out round-robin
//!
//! Inference is CPU-bound and blocking, so [`Embedder::embed`] moves it onto
//! the blocking thread pool.

use super::{Embedder, EmbeddingError};
use async_trait::async_trait;
use ndarray::{Array2, ArrayView2, Axis, Ix2};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

/// Configuration for loading an ONNX embedding model
#[derive(Debug, Clone)]
pub struct EmbeddingModelConfig {
    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub name: String,
    /// Path to ONNX model file
    pub model_path: PathBuf,
    /// Path to tokenizer JSON file
    pub tokenizer_path: PathBuf,
    /// Number of independent inference sessions
    pub session_pool_size: usize,
    /// ONNX Runtime intra-op threads per session
    pub intra_threads: usize,
    /// Token limit; longer inputs are truncated
    pub max_length: usize,
    /// Expected output dimension, checked at load time when set
    pub expected_dimension: Option<usize>,
}

impl Default for EmbeddingModelConfig {
    fn default() -> Self {
        Self {
            name: "all-MiniLM-L6-v2".to_string(),
            model_path: PathBuf::from("./models/all-MiniLM-L6-v2-onnx/model.onnx"),
            tokenizer_path: PathBuf::from("./models/all-MiniLM-L6-v2-onnx/tokenizer.json"),
            session_pool_size: 1,
            intra_threads: 4,
            max_length: 256,
            expected_dimension: None,
        }
    }
}

/// ONNX-based sentence embedding model
///
/// # Thread Safety
/// An ONNX session is not shared between concurrent `run` calls: every
/// session sits behind its own mutex and callers take sessions round-robin.
/// All fields are behind `Arc`, so cloning is cheap and clones share the pool.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    sessions: Arc<Vec<Mutex<Session>>>,
    next_session: Arc<AtomicUsize>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    /// Hidden size reported by the probe inference
    dimension: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads the model and tokenizer from disk
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file is missing or invalid
    /// - ONNX Runtime initialization fails
    /// - The probe inference does not produce `[batch, seq_len, hidden]`
    /// - `expected_dimension` is set and differs from the hidden size
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(EmbeddingModelConfig::default()).await?;
    /// let embedding = model.embed("Hello world").await?;
    /// ```
    pub async fn new(config: EmbeddingModelConfig) -> Result<Self, EmbeddingError> {
        tokio::task::spawn_blocking(move || Self::load(config)).await?
    }

    fn load(config: EmbeddingModelConfig) -> Result<Self, EmbeddingError> {
        if config.session_pool_size == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "session pool size must be greater than 0".to_string(),
            ));
        }
        if !config.model_path.exists() {
            return Err(EmbeddingError::FileNotFound {
                kind: "ONNX model",
                path: config.model_path,
            });
        }
        if !config.tokenizer_path.exists() {
            return Err(EmbeddingError::FileNotFound {
                kind: "Tokenizer",
                path: config.tokenizer_path,
            });
        }

        info!(
            "Loading ONNX embedding model {} ({} session(s), {} intra threads)",
            config.name, config.session_pool_size, config.intra_threads
        );

        let mut sessions = Vec::with_capacity(config.session_pool_size);
        for _ in 0..config.session_pool_size {
            let session = Session::builder()
                .map_err(EmbeddingError::runtime)?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .map_err(EmbeddingError::runtime)?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .map_err(EmbeddingError::runtime)?
                .with_intra_threads(config.intra_threads)
                .map_err(EmbeddingError::runtime)?
                .commit_from_file(&config.model_path)
                .map_err(|e| {
                    EmbeddingError::Runtime(format!(
                        "Failed to load ONNX model from {}: {}",
                        config.model_path.display(),
                        e
                    ))
                })?;
            sessions.push(Mutex::new(session));
        }

        let mut tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| EmbeddingError::TokenizerLoad(e.to_string()))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_length,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::TokenizerLoad(e.to_string()))?;

        let mut model = Self {
            sessions: Arc::new(sessions),
            next_session: Arc::new(AtomicUsize::new(0)),
            tokenizer: Arc::new(tokenizer),
            model_name: config.name,
            dimension: 0,
        };

        let probe = model.embed_blocking("validation test")?;
        if let Some(expected) = config.expected_dimension {
            if probe.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: probe.len(),
                });
            }
        }
        model.dimension = probe.len();

        info!(
            "ONNX embedding model {} loaded ({} dimensions)",
            model.model_name, model.dimension
        );

        Ok(model)
    }

    /// Takes the next session in round-robin order
    fn checkout(&self) -> Result<MutexGuard<'_, Session>, EmbeddingError> {
        let index = self.next_session.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        self.sessions[index]
            .lock()
            .map_err(|_| EmbeddingError::SessionPoisoned)
    }

    /// Tokenize, run inference and mean-pool on the calling thread
    fn embed_blocking(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::Tokenization(e.to_string()))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let seq_len = input_ids.len();
        let token_type_ids: Vec<i64> = vec![0i64; seq_len];

        let input_ids_array = Array2::from_shape_vec((1, seq_len), input_ids)?;
        let attention_mask_array = Array2::from_shape_vec((1, seq_len), attention_mask.clone())?;
        let token_type_ids_array = Array2::from_shape_vec((1, seq_len), token_type_ids)?;

        let mut session = self.checkout()?;
        let outputs = session
            .run(ort::inputs![
                "input_ids" => Value::from_array(input_ids_array).map_err(EmbeddingError::runtime)?,
                "attention_mask" => Value::from_array(attention_mask_array).map_err(EmbeddingError::runtime)?,
                "token_type_ids" => Value::from_array(token_type_ids_array).map_err(EmbeddingError::runtime)?
            ])
            .map_err(EmbeddingError::runtime)?;

        // Output names differ between exports, so take the first output
        let output = outputs[0]
            .try_extract_array::<f32>()
            .map_err(EmbeddingError::runtime)?;

        let shape = output.shape().to_vec();
        if shape.len() != 3 || shape[0] != 1 {
            return Err(EmbeddingError::UnexpectedOutputShape(shape));
        }

        let token_embeddings = output.index_axis(Axis(0), 0).into_dimensionality::<Ix2>()?;
        let pooled = mean_pool(token_embeddings, &attention_mask)?;

        debug!("Embedded {} tokens into {} dimensions", seq_len, pooled.len());
        Ok(pooled)
    }

    /// Counts non-padding tokens, special tokens included
    pub fn count_tokens(&self, text: &str) -> Result<usize, EmbeddingError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::Tokenization(e.to_string()))?;

        Ok(encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as usize)
            .sum())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Averages token embeddings `[seq_len, hidden]`, ignoring masked positions
pub(crate) fn mean_pool(
    token_embeddings: ArrayView2<'_, f32>,
    attention_mask: &[i64],
) -> Result<Vec<f32>, EmbeddingError> {
    if token_embeddings.nrows() != attention_mask.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: attention_mask.len(),
            actual: token_embeddings.nrows(),
        });
    }

    let mut pooled = vec![0.0f32; token_embeddings.ncols()];
    let mut sum_mask = 0.0f32;

    for (row, &mask) in token_embeddings.outer_iter().zip(attention_mask) {
        let weight = mask as f32;
        sum_mask += weight;
        for (acc, value) in pooled.iter_mut().zip(row.iter()) {
            *acc += value * weight;
        }
    }

    for value in &mut pooled {
        *value /= sum_mask.max(1e-9);
    }

    Ok(pooled)
}

#[async_trait]
impl Embedder for OnnxEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = self.clone();
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || model.embed_blocking(&text)).await?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
