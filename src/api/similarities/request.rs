// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SimilarityRequest type for POST /similarities
//!
//! The body arrives as an untyped JSON value so that falsy and mistyped
//! `tasks` map onto the service's client errors instead of a serde rejection.

use crate::api::errors::{ApiError, TASKS_NOT_STRINGS};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for POST /similarities
///
/// # Example
/// ```json
/// { "tasks": ["buy milk", "buy bread", "walk the dog"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRequest {
    /// Texts to compare; duplicates are distinct positions
    pub tasks: Vec<String>,
}

impl SimilarityRequest {
    /// Builds a request from a parsed JSON body
    ///
    /// # Rules
    /// 1. Non-object body -> "no json body"
    /// 2. `tasks` absent or falsy (`null`, `false`, `0`, `""`, `[]`, `{}`)
    ///    -> "missing tasks in body"
    /// 3. Any other non-array, or an array holding a non-string
    ///    -> "tasks must be an array of strings"
    pub fn from_json_value(body: &Value) -> Result<Self, ApiError> {
        let object = body.as_object().ok_or_else(ApiError::no_json_body)?;

        let tasks = match object.get("tasks") {
            Some(tasks) if is_truthy(tasks) => tasks,
            _ => return Err(ApiError::missing_tasks()),
        };

        let items = tasks
            .as_array()
            .ok_or_else(|| ApiError::InvalidRequest(TASKS_NOT_STRINGS.to_string()))?;

        let tasks = items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| ApiError::InvalidRequest(TASKS_NOT_STRINGS.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tasks })
    }

    /// Enforces the task limit
    pub fn validate(&self, max_tasks: usize) -> Result<(), ApiError> {
        if self.tasks.is_empty() {
            return Err(ApiError::missing_tasks());
        }

        if self.tasks.len() > max_tasks {
            return Err(ApiError::InvalidRequest(format!(
                "tasks cannot contain more than {} items (got {})",
                max_tasks,
                self.tasks.len()
            )));
        }

        Ok(())
    }
}

/// JSON truthiness: null, false, zero, and empty strings/arrays/objects are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
