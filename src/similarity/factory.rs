// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use super::{EmbeddingSimilarity, SimilarityModel};
use crate::embeddings::{
    EmbeddingError, EmbeddingModelConfig, HashingConfig, HashingEmbedder, OnnxEmbeddingModel,
};
use std::sync::Arc;
use tracing::info;

/// Which model backs the service
#[derive(Debug, Clone)]
pub enum ModelBackendConfig {
    Onnx(EmbeddingModelConfig),
    Hashing(HashingConfig),
}

/// Loads the configured model once; the result is shared by all requests
pub async fn build_similarity_model(
    config: ModelBackendConfig,
) -> Result<Arc<dyn SimilarityModel>, EmbeddingError> {
    let model: Arc<dyn SimilarityModel> = match config {
        ModelBackendConfig::Onnx(c) => {
            Arc::new(EmbeddingSimilarity::new(OnnxEmbeddingModel::new(c).await?))
        }
        ModelBackendConfig::Hashing(c) => Arc::new(EmbeddingSimilarity::new(HashingEmbedder::new(c)?)),
    };

    info!("Similarity model ready: {}", model.model_name());
    Ok(model)
}
