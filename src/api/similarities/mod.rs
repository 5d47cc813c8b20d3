// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Similarity API Module
//!
//! Provides the POST /similarities endpoint: pairwise similarity scores for a
//! batch of text snippets.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::similarities_handler;
pub use request::SimilarityRequest;
pub use response::SimilarityResponse;
