// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the similarity service

/// Semantic version number, taken from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "pairwise-similarity",
    "onnx-embeddings",
    "hashing-embeddings",
    "per-request-embedding-reuse",
    "session-pool",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Similarity Service {}", VERSION)
}
