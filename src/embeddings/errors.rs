// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for embedding backends
//!
//! Covers model loading (missing files, invalid configuration), tokenization,
//! ONNX inference and the blocking-pool plumbing around it.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading an embedding model or embedding text
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// A model artifact (ONNX graph or tokenizer) is missing on disk
    #[error("{kind} file not found: {}", path.display())]
    FileNotFound { kind: &'static str, path: PathBuf },

    /// Backend configuration is unusable
    #[error("Invalid embedding configuration: {0}")]
    InvalidConfig(String),

    /// Tokenizer JSON could not be loaded
    #[error("Failed to load tokenizer: {0}")]
    TokenizerLoad(String),

    /// Tokenizer rejected the input text
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    /// ONNX Runtime failed to build a session or run inference
    #[error("ONNX runtime error: {0}")]
    Runtime(String),

    /// Input tensor could not be shaped from the token ids
    #[error("Failed to build input tensor: {0}")]
    Tensor(#[from] ndarray::ShapeError),

    /// Model output is not `[batch, seq_len, hidden]`
    #[error("Model outputs unexpected shape {0:?} (expected [batch, seq_len, hidden])")]
    UnexpectedOutputShape(Vec<usize>),

    /// Two vectors that must agree in length do not
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A thread panicked while holding an inference session
    #[error("Inference session lock poisoned")]
    SessionPoisoned,

    /// The blocking inference task was cancelled or panicked
    #[error("Embedding task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl EmbeddingError {
    pub(crate) fn runtime(err: impl std::fmt::Display) -> Self {
        EmbeddingError::Runtime(err.to_string())
    }
}
