// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error handling tests for POST /similarities
//!
//! - Missing or malformed bodies return 400 "no json body"
//! - Missing or empty tasks return 400 "missing tasks in body"
//! - Model failures return 500 with no partial results

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use similarity_service::{
    api::{create_app, ApiConfig, AppState, DEFAULT_MAX_TASKS},
    similarity::SimilarityModel,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

/// Returns 0.5, or fails on any pair containing "poison"
struct PoisonAware {
    calls: AtomicUsize,
}

#[async_trait]
impl SimilarityModel for PoisonAware {
    async fn similarity(&self, left: &str, right: &str) -> Result<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if left == "poison" || right == "poison" {
            return Err(anyhow!("unsupported input: poison"));
        }
        Ok(0.5)
    }

    fn model_name(&self) -> &str {
        "poison-aware"
    }
}

fn app_with(model: Arc<PoisonAware>, config: ApiConfig) -> Router {
    create_app(AppState::new(model, config))
}

fn app() -> Router {
    app_with(
        Arc::new(PoisonAware {
            calls: AtomicUsize::new(0),
        }),
        ApiConfig::default(),
    )
}

async fn send(app: Router, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri("/similarities");
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn test_empty_body_no_json_body() {
    let (status, body) = send(app(), Some("application/json"), "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no json body");
    assert_eq!(body["error_type"], "invalid_request");
}

#[tokio::test]
async fn test_unparseable_body_no_json_body() {
    let (status, body) = send(app(), Some("application/json"), "{tasks: [cat]").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no json body");
}

#[tokio::test]
async fn test_missing_content_type_no_json_body() {
    let (status, body) = send(app(), None, r#"{"tasks": ["cat", "dog"]}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no json body");
}

#[tokio::test]
async fn test_form_content_type_no_json_body() {
    let (status, body) = send(
        app(),
        Some("application/x-www-form-urlencoded"),
        r#"{"tasks": ["cat", "dog"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no json body");
}

#[tokio::test]
async fn test_non_object_body_no_json_body() {
    let (status, body) = send(app(), Some("application/json"), r#"["cat", "dog"]"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "no json body");
}

#[tokio::test]
async fn test_empty_object_missing_tasks() {
    let (status, body) = send(app(), Some("application/json"), "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing tasks in body");
}

#[tokio::test]
async fn test_empty_tasks_missing_tasks() {
    for payload in [r#"{"tasks": []}"#, r#"{"tasks": null}"#, r#"{"tasks": ""}"#] {
        let (status, body) = send(app(), Some("application/json"), payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(body["message"], "missing tasks in body", "payload: {}", payload);
    }
}

#[tokio::test]
async fn test_non_string_tasks_rejected() {
    let (status, body) = send(app(), Some("application/json"), r#"{"tasks": [1, 2, 3]}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "tasks must be an array of strings");
}

#[tokio::test]
async fn test_max_tasks_limit() {
    let model = Arc::new(PoisonAware {
        calls: AtomicUsize::new(0),
    });
    let config = ApiConfig {
        max_tasks: 2,
        ..Default::default()
    };

    let (status, body) = send(
        app_with(model.clone(), config),
        Some("application/json"),
        r#"{"tasks": ["a", "b", "c"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("more than 2"));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_oversized_task_list_rejected_by_default() {
    let model = Arc::new(PoisonAware {
        calls: AtomicUsize::new(0),
    });
    let app = app_with(model.clone(), ApiConfig::default());

    // ~1.8 MB, under the body limit; 600k tasks would be ~1.8e11 pairs
    let tasks = vec![""; 600_000];
    let payload = serde_json::json!({ "tasks": tasks }).to_string();
    let (status, body) = send(app.clone(), Some("application/json"), &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains(&format!("more than {}", DEFAULT_MAX_TASKS)));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);

    // Still serving afterwards
    let (status, body) = send(app, Some("application/json"), r#"{"tasks": ["a", "b"]}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_task_list_at_default_limit_accepted() {
    let model = Arc::new(PoisonAware {
        calls: AtomicUsize::new(0),
    });
    let tasks: Vec<String> = (0..DEFAULT_MAX_TASKS).map(|i| i.to_string()).collect();
    let payload = serde_json::json!({ "tasks": tasks }).to_string();

    let (status, body) = send(
        app_with(model.clone(), ApiConfig::default()),
        Some("application/json"),
        &payload,
    )
    .await;

    let expected = DEFAULT_MAX_TASKS * (DEFAULT_MAX_TASKS - 1) / 2;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), expected);
    assert_eq!(model.calls.load(Ordering::SeqCst), expected);
}

#[tokio::test]
async fn test_model_failure_is_500_without_partial_results() {
    let model = Arc::new(PoisonAware {
        calls: AtomicUsize::new(0),
    });

    let (status, body) = send(
        app_with(model.clone(), ApiConfig::default()),
        Some("application/json"),
        r#"{"tasks": ["a", "b", "poison", "c"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_type"], "internal_error");
    assert_eq!(body["message"], "internal error");
    assert!(!body.is_array());
    // (0,1) succeeds, (0,2) fails and aborts
    assert_eq!(model.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_model_failure_details_in_debug_mode() {
    let model = Arc::new(PoisonAware {
        calls: AtomicUsize::new(0),
    });
    let config = ApiConfig {
        enable_error_details: true,
        ..Default::default()
    };

    let (status, body) = send(
        app_with(model, config),
        Some("application/json"),
        r#"{"tasks": ["poison", "b"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("unsupported input: poison"));
}
