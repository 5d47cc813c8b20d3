// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body missing, unparseable, not sent as JSON, or not a JSON object
pub const NO_JSON_BODY: &str = "no json body";
/// `tasks` absent or falsy
pub const MISSING_TASKS: &str = "missing tasks in body";
/// `tasks` present but not an array of strings
pub const TASKS_NOT_STRINGS: &str = "tasks must be an array of strings";
/// Generic message for 500 responses when error details are hidden
pub const INTERNAL_ERROR: &str = "internal error";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn no_json_body() -> Self {
        ApiError::InvalidRequest(NO_JSON_BODY.to_string())
    }

    pub fn missing_tasks() -> Self {
        ApiError::InvalidRequest(MISSING_TASKS.to_string())
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg),
            ApiError::InternalError(msg) => ("internal_error", msg),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message: message.clone(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
