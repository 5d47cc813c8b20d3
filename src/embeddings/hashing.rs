// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic hashing embedder
//!
//! Every lowercase word token is mapped to a pseudo-random vector seeded by
//! the token's hash, and a text is represented by the mean of its token
//! vectors. Texts sharing words therefore score higher than unrelated texts,
//! which is enough for local development and tests without model files.

use super::{Embedder, EmbeddingError};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub struct HashingConfig {
    /// Name reported by the model
    pub name: String,
    /// Vector length
    pub dimension: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            name: "hashing".to_string(),
            dimension: 384,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    config: HashingConfig,
}

impl HashingEmbedder {
    pub fn new(config: HashingConfig) -> Result<Self, EmbeddingError> {
        if config.dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "Embedding dimension must be greater than 0".to_string(),
            ));
        }

        Ok(Self { config })
    }

    /// Unit-length pseudo-random vector for one token
    fn token_vector(&self, token: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let seed = hasher.finish();

        let mut vector = Vec::with_capacity(self.config.dimension);

        // Linear congruential generator, values in [-1, 1]
        let mut current_seed = seed;
        for i in 0..self.config.dimension {
            current_seed =
                (current_seed.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);
            let value = (current_seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            vector.push(value as f32);
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }

    /// Embeds without going through the async trait
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut pooled = vec![0.0f32; self.config.dimension];
        let mut count = 0usize;

        for token in tokenize(text) {
            for (acc, value) in pooled.iter_mut().zip(self.token_vector(&token)) {
                *acc += value;
            }
            count += 1;
        }

        if count > 0 {
            for value in &mut pooled {
                *value /= count as f32;
            }
        }

        pooled
    }
}

/// Lowercase alphanumeric word tokens
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.name
    }
}
