// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Pairwise text similarity
//!
//! [`SimilarityModel`] is the single seam between the HTTP layer and the
//! model that scores two texts. The handler only ever calls
//! [`SimilarityModel::pairwise`], which enumerates unordered pairs `(i, j)`
//! with `i < j` in positional order: `(0,1), (0,2), ..., (1,2), ...`.

pub mod embedding;
pub mod factory;

pub use embedding::EmbeddingSimilarity;
pub use factory::{build_similarity_model, ModelBackendConfig};

use crate::embeddings::EmbeddingError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Score for one unordered pair of input texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Text at the lower position, verbatim
    pub left: String,
    /// Text at the higher position, verbatim
    pub right: String,
    /// Model-defined score, not clamped
    pub similarity: f32,
}

/// Number of unordered pairs over `n` positions, saturating on overflow
pub fn pair_count(n: usize) -> usize {
    n.saturating_mul(n.saturating_sub(1)) / 2
}

/// Index pairs `(i, j)`, `i < j`, in enumeration order
pub fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
}

/// Empty result buffer sized for every pair of `task_count` tasks
///
/// Fails instead of aborting when the allocator cannot provide the space.
pub fn result_buffer(task_count: usize) -> Result<Vec<SimilarityResult>> {
    let mut results = Vec::new();
    results
        .try_reserve_exact(pair_count(task_count))
        .with_context(|| format!("cannot allocate results for {} tasks", task_count))?;
    Ok(results)
}

/// Scores how similar two texts are
#[async_trait]
pub trait SimilarityModel: Send + Sync {
    async fn similarity(&self, left: &str, right: &str) -> Result<f32>;

    fn model_name(&self) -> &str;

    /// Scores every unordered pair of `tasks` in enumeration order.
    ///
    /// Duplicate strings are distinct positions. The first failing pair
    /// aborts the whole computation.
    async fn pairwise(&self, tasks: &[String]) -> Result<Vec<SimilarityResult>> {
        let mut results = result_buffer(tasks.len())?;

        for (i, j) in pairs(tasks.len()) {
            let (left, right) = (&tasks[i], &tasks[j]);
            let similarity = self.similarity(left, right).await?;
            results.push(SimilarityResult {
                left: left.clone(),
                right: right.clone(),
                similarity,
            });
        }

        Ok(results)
    }
}

/// Cosine of the angle between two vectors; 0.0 if either is all zeros
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
