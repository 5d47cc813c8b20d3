// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod similarity;
pub mod version;

pub use api::{create_app, ApiConfig, ApiError, ApiServer, AppState};
pub use config::ServiceConfig;
pub use embeddings::{Embedder, EmbeddingError, HashingEmbedder, OnnxEmbeddingModel};
pub use similarity::{
    build_similarity_model, EmbeddingSimilarity, ModelBackendConfig, SimilarityModel,
    SimilarityResult,
};
