// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed and POST /embed_batch handlers

use crate::api::embed::{BatchEmbedBody, BatchEmbedQuery, BatchEmbedResponse, EmbedRequest, EmbedResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{error, info};

/// POST /embed handler
///
/// # Request Body
/// ```json
/// { "text": "hello", "model_name": "BAAI/bge-large-zh-v1.5" }
/// ```
///
/// # Response Body
/// ```json
/// { "embedding": [0.1, ...], "model_name": "BAAI/bge-large-zh-v1.5", "vector_size": 1024 }
/// ```
pub async fn embed_handler(
    State(state): State<AppState>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let result = state
        .service
        .embed_one(&request.text, request.model_name.as_deref())
        .await
        .map_err(|e| {
            error!("Embedding generation failed: {}", e);
            ApiError::EmbedFailed(e)
        })?;

    Ok(Json(result.into()))
}

/// POST /embed_batch handler
///
/// Accepts a JSON array of texts with `?model_name=` or an object with
/// `texts` and `model_name`.
pub async fn embed_batch_handler(
    State(state): State<AppState>,
    Query(query): Query<BatchEmbedQuery>,
    Json(body): Json<BatchEmbedBody>,
) -> Result<Json<BatchEmbedResponse>, ApiError> {
    let (texts, model_name) = body.into_parts(query);
    info!("Batch embedding request: {} texts", texts.len());

    let result = state
        .service
        .embed_batch(texts, model_name.as_deref())
        .await
        .map_err(|e| {
            error!("Batch embedding generation failed: {}", e);
            ApiError::BatchEmbedFailed(e)
        })?;

    Ok(Json(result.into()))
}
