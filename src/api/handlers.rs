// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::api::http_server::AppState;
use crate::embeddings::CatalogEntry;
use crate::version;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelsResponse {
    pub models: Vec<CatalogEntry>,
    pub current_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub current_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
    pub health: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointDoc {
    pub method: String,
    pub path: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocsResponse {
    pub endpoints: Vec<EndpointDoc>,
}

const ENDPOINTS: [(&str, &str, &str); 6] = [
    ("POST", "/embed", "Embed one text: {text, model_name?}"),
    (
        "POST",
        "/embed_batch",
        "Embed a list of texts: [texts] with ?model_name=, or {texts, model_name?}",
    ),
    ("GET", "/models", "Known models and the resident model"),
    ("GET", "/health", "Service health and resident model"),
    ("GET", "/", "Service banner"),
    ("GET", "/docs", "This endpoint list"),
];

pub async fn models_handler(State(state): State<AppState>) -> Json<ModelsResponse> {
    let listing = state.service.list_models().await;
    Json(ModelsResponse {
        models: listing.models,
        current_model: listing.current_model,
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.service.health().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: health.model_loaded,
        current_model: health.current_model,
    })
}

pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: version::SERVICE_NAME.to_string(),
        version: version::VERSION.to_string(),
        docs: "/docs".to_string(),
        health: "/health".to_string(),
    })
}

pub async fn docs_handler() -> Json<DocsResponse> {
    Json(DocsResponse {
        endpoints: ENDPOINTS
            .iter()
            .map(|(method, path, summary)| EndpointDoc {
                method: method.to_string(),
                path: path.to_string(),
                summary: summary.to_string(),
            })
            .collect(),
    })
}
