// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /similarities HTTP handler

use super::{SimilarityRequest, SimilarityResponse};
use crate::api::errors::{ApiError, INTERNAL_ERROR};
use crate::api::http_server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error};

/// Scores every unordered pair of the submitted tasks
///
/// # Request Body
/// ```json
/// { "tasks": ["cat", "dog", "horse"] }
/// ```
///
/// # Response Body
/// ```json
/// [
///   { "left": "cat", "right": "dog", "similarity": 0.80 },
///   { "left": "cat", "right": "horse", "similarity": 0.67 },
///   { "left": "dog", "right": "horse", "similarity": 0.70 }
/// ]
/// ```
///
/// # Errors
/// - 400 `"no json body"`: body missing, unparseable, not sent as JSON, or
///   not a JSON object
/// - 400 `"missing tasks in body"`: `tasks` absent or falsy
/// - 400 `"tasks must be an array of strings"`: `tasks` truthy but not an
///   array of strings, e.g. `{"tasks": [1]}`
/// - 400 when `tasks` exceeds the configured limit, checked before any
///   pair is scored
/// - 500 when the model fails; no partial results are returned
pub async fn similarities_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SimilarityResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        debug!("Rejected similarity request: {}", rejection.body_text());
        ApiError::no_json_body()
    })?;

    let request = SimilarityRequest::from_json_value(&body).inspect_err(|e| {
        debug!("Rejected similarity request: {}", e);
    })?;
    request.validate(state.config.max_tasks)?;

    let started = Instant::now();
    let results = state.model.pairwise(&request.tasks).await.map_err(|e| {
        error!(
            "Similarity model {} failed on {} tasks: {:#}",
            state.model.model_name(),
            request.tasks.len(),
            e
        );
        if state.config.enable_error_details {
            ApiError::InternalError(format!("{:#}", e))
        } else {
            ApiError::InternalError(INTERNAL_ERROR.to_string())
        }
    })?;

    let response = SimilarityResponse::from(results);
    debug!(
        "Scored {} pairs from {} tasks in {:?}",
        response.len(),
        request.tasks.len(),
        started.elapsed()
    );

    Ok(Json(response))
}
