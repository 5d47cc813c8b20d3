// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SimilarityResponse type for POST /similarities
//!
//! Serialized as a bare JSON array, one object per input pair:
//! ```json
//! [
//!   { "left": "cat", "right": "dog", "similarity": 0.8 }
//! ]
//! ```

use crate::similarity::SimilarityResult;
use serde::{Deserialize, Serialize};

/// Results in pair-enumeration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityResponse(pub Vec<SimilarityResult>);

impl SimilarityResponse {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn results(&self) -> &[SimilarityResult] {
        &self.0
    }
}

impl From<Vec<SimilarityResult>> for SimilarityResponse {
    fn from(results: Vec<SimilarityResult>) -> Self {
        SimilarityResponse(results)
    }
}
