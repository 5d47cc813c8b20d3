// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Text embedding backends
//!
//! An [`Embedder`] turns a text into a fixed-length vector. Two backends are
//! provided:
//! - [`OnnxEmbeddingModel`]: sentence transformer served by ONNX Runtime
//! - [`HashingEmbedder`]: deterministic averaged word vectors, no model files

pub mod errors;
pub mod hashing;
pub mod onnx_model;

pub use errors::EmbeddingError;
pub use hashing::{HashingConfig, HashingEmbedder};
pub use onnx_model::{EmbeddingModelConfig, OnnxEmbeddingModel};

use async_trait::async_trait;

/// Produces a vector representation of a text
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a single text. The same text always yields the same vector
    /// for a given loaded model.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Length of the vectors returned by [`Embedder::embed`]
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}
