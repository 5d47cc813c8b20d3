// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::server::ApiConfig;
use super::similarities::similarities_handler;
use crate::similarity::SimilarityModel;

/// Shared router state: the process-wide model plus request limits
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn SimilarityModel>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(model: Arc<dyn SimilarityModel>, config: ApiConfig) -> Self {
        Self {
            model,
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub version: String,
    pub features: Vec<String>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/similarities", post(similarities_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: state.model.model_name().to_string(),
        version: crate::version::VERSION.to_string(),
        features: crate::version::FEATURES
            .iter()
            .map(|f| f.to_string())
            .collect(),
    })
}
