// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Similarity as cosine of embeddings

use super::{cosine_similarity, pairs, result_buffer, SimilarityModel, SimilarityResult};
use crate::embeddings::Embedder;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Adapts an [`Embedder`] into a [`SimilarityModel`]
#[derive(Debug, Clone)]
pub struct EmbeddingSimilarity<E> {
    embedder: E,
}

impl<E: Embedder> EmbeddingSimilarity<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}

#[async_trait]
impl<E: Embedder> SimilarityModel for EmbeddingSimilarity<E> {
    async fn similarity(&self, left: &str, right: &str) -> Result<f32> {
        let left_vec = self.embedder.embed(left).await?;
        let right_vec = self.embedder.embed(right).await?;
        Ok(cosine_similarity(&left_vec, &right_vec)?)
    }

    fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    /// Embeds each distinct text once, then scores pairs from the cached
    /// vectors. Embedding is deterministic, so scores match per-pair
    /// [`SimilarityModel::similarity`] calls.
    async fn pairwise(&self, tasks: &[String]) -> Result<Vec<SimilarityResult>> {
        let mut vectors: HashMap<&str, Vec<f32>> = HashMap::new();
        for (index, task) in tasks.iter().enumerate() {
            if vectors.contains_key(task.as_str()) {
                continue;
            }
            let vector = self
                .embedder
                .embed(task)
                .await
                .with_context(|| format!("failed to embed task {}", index))?;
            vectors.insert(task.as_str(), vector);
        }

        debug!(
            "Embedded {} distinct of {} tasks with {}",
            vectors.len(),
            tasks.len(),
            self.embedder.model_name()
        );

        let mut results = result_buffer(tasks.len())?;
        for (i, j) in pairs(tasks.len()) {
            let (left, right) = (&tasks[i], &tasks[j]);
            let similarity =
                cosine_similarity(&vectors[left.as_str()], &vectors[right.as_str()])?;
            results.push(SimilarityResult {
                left: left.clone(),
                right: right.clone(),
                similarity,
            });
        }

        Ok(results)
    }
}
