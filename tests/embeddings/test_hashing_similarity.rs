// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Hashing backend behavior through the similarity interface
//!
//! The hashing backend is the one model whose scores are pinned: identical
//! texts score 1.0, texts without shared words score near 0.0, and every
//! score lies in [-1, 1].

use similarity_service::{
    build_similarity_model,
    embeddings::{Embedder, HashingConfig, HashingEmbedder},
    similarity::{cosine_similarity, ModelBackendConfig, SimilarityModel},
};

fn tasks(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_identical_texts_score_one() {
    let model = build_similarity_model(ModelBackendConfig::Hashing(HashingConfig::default()))
        .await
        .unwrap();

    let score = model.similarity("plan the release", "plan the release").await.unwrap();
    assert!((score - 1.0).abs() < 1e-5, "score = {}", score);
}

#[tokio::test]
async fn test_scores_within_cosine_range() {
    let model = build_similarity_model(ModelBackendConfig::Hashing(HashingConfig::default()))
        .await
        .unwrap();
    let input = tasks(&[
        "fix login bug",
        "fix logout bug",
        "write release notes",
        "deploy to production",
        "",
    ]);

    let results = model.pairwise(&input).await.unwrap();

    assert_eq!(results.len(), 10);
    for result in results {
        assert!(result.similarity.is_finite());
        assert!(
            (-1.0 - 1e-5..=1.0 + 1e-5).contains(&result.similarity),
            "{:?}",
            result
        );
    }
}

#[tokio::test]
async fn test_word_overlap_orders_scores() {
    let model = build_similarity_model(ModelBackendConfig::Hashing(HashingConfig::default()))
        .await
        .unwrap();

    let half = model.similarity("fix login bug", "fix logout bug").await.unwrap();
    let none = model.similarity("fix login bug", "write release notes").await.unwrap();

    assert!(half > none, "half = {}, none = {}", half, none);
}

#[tokio::test]
async fn test_embedder_and_cosine_agree_with_model() {
    let embedder = HashingEmbedder::new(HashingConfig::default()).unwrap();
    let model = build_similarity_model(ModelBackendConfig::Hashing(HashingConfig::default()))
        .await
        .unwrap();

    let a = embedder.embed("cat").await.unwrap();
    let b = embedder.embed("dog").await.unwrap();
    assert_eq!(a.len(), embedder.dimension());

    let direct = cosine_similarity(&a, &b).unwrap();
    let via_model = model.similarity("cat", "dog").await.unwrap();
    assert_eq!(direct, via_model);
}
