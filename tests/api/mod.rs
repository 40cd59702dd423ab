// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Router helpers shared by the API tests

use crate::common::{service_with_fake_loader, FakeLoader};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use embedding_service::api::{create_app, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

mod test_embed_batch_endpoint;
mod test_models_health;

/// Router over a fake-loader service with the default model already
/// resident, as after startup
pub async fn started_app() -> (Router, Arc<FakeLoader>) {
    let (service, loader) = service_with_fake_loader();
    service
        .load_default_model()
        .await
        .expect("Default model should load");
    (create_app(AppState::new(service)), loader)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
