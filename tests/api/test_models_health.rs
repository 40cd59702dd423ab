// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET /models, GET /health, GET /

use super::{send, started_app};
use crate::common::service_with_fake_loader;
use axum::http::{Method, StatusCode};
use embedding_service::api::{create_app, AppState};
use embedding_service::embeddings::DEFAULT_MODEL;
use serde_json::json;

#[tokio::test]
async fn test_health_after_startup() {
    let (app, _loader) = started_app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "model_loaded": true, "current_model": DEFAULT_MODEL})
    );
}

#[tokio::test]
async fn test_health_before_any_model() {
    let (service, _loader) = service_with_fake_loader();
    let app = create_app(AppState::new(service));

    let (_, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(
        body,
        json!({"status": "healthy", "model_loaded": false, "current_model": null})
    );
}

#[tokio::test]
async fn test_models_lists_catalog_regardless_of_resident() {
    let (app, _loader) = started_app().await;

    let (status, before) = send(&app, Method::GET, "/models", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(before["current_model"], DEFAULT_MODEL);

    send(
        &app,
        Method::POST,
        "/embed",
        Some(json!({"text": "x", "model_name": "test/dim-16"})),
    )
    .await;
    let (_, after) = send(&app, Method::GET, "/models", None).await;

    assert_eq!(after["current_model"], "test/dim-16");
    assert_eq!(before["models"], after["models"]);

    let models = after["models"].as_array().unwrap();
    assert_eq!(models.len(), 5);
    assert_eq!(
        models[0],
        json!({"name": "BAAI/bge-large-zh-v1.5", "description": "Chinese-optimized large model", "vector_size": 1024})
    );
    let names: Vec<&str> = models.iter().map(|m| m["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "BAAI/bge-large-zh-v1.5",
            "BAAI/bge-large-en-v1.5",
            "BAAI/bge-base-zh-v1.5",
            "BAAI/bge-small-zh-v1.5",
            "all-MiniLM-L6-v2",
        ]
    );
}

#[tokio::test]
async fn test_root_banner() {
    let (app, _loader) = started_app().await;

    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["docs"], "/docs");
    assert_eq!(body["health"], "/health");
    assert!(body["message"].is_string());

    let (status, docs) = send(&app, Method::GET, "/docs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(docs["endpoints"].as_array().unwrap().len(), 6);
}
