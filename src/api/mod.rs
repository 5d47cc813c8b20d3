// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod server;
pub mod similarities;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, AppState, HealthResponse};
pub use server::{ApiConfig, ApiServer, DEFAULT_MAX_TASKS};
pub use similarities::{similarities_handler, SimilarityRequest, SimilarityResponse};
