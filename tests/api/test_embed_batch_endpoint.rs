// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed_batch

use super::{send, started_app};
use axum::http::{Method, StatusCode};
use embedding_service::embeddings::DEFAULT_MODEL;
use serde_json::json;

#[tokio::test]
async fn test_batch_array_body_with_query_model() {
    let (app, _loader) = started_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/embed_batch?model_name=all-MiniLM-L6-v2",
        Some(json!(["first", "second", "third"])),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_name"], "all-MiniLM-L6-v2");
    assert_eq!(body["batch_size"], 3);
    assert_eq!(body["vector_size"], 384);
    let embeddings = body["embeddings"].as_array().unwrap();
    assert_eq!(embeddings.len(), 3);
    for embedding in embeddings {
        assert_eq!(embedding.as_array().unwrap().len(), 384);
    }
}

#[tokio::test]
async fn test_batch_object_body_defaults_model() {
    let (app, _loader) = started_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/embed_batch",
        Some(json!({"texts": ["only one"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_name"], DEFAULT_MODEL);
    assert_eq!(body["batch_size"], 1);
}

#[tokio::test]
async fn test_single_and_batch_endpoints_agree() {
    let (app, _loader) = started_app().await;

    let (_, single) = send(&app, Method::POST, "/embed", Some(json!({"text": "same text"}))).await;
    let (_, batch) = send(&app, Method::POST, "/embed_batch", Some(json!(["same text"]))).await;

    assert_eq!(single["embedding"], batch["embeddings"][0]);
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let (app, loader) = started_app().await;

    let (status, body) = send(&app, Method::POST, "/embed_batch", Some(json!([]))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Batch embedding generation failed: texts must contain at least one item"
    );
    assert_eq!(loader.load_count(), 1);
}
