// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use embedding_service::{
    api::{start_server, AppState},
    config::ServiceConfig,
    embeddings::{EmbeddingService, OnnxModelLoader},
    version,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::parse();

    info!("🚀 Starting {}", version::get_version_string());
    info!("Listening address: {}", config.bind_address());
    info!("Default model: {}", config.default_model);

    let loader = OnnxModelLoader::new(config.model_cache_dir.clone(), config.max_sequence_length);
    let service = EmbeddingService::new(Arc::new(loader), config.default_model.clone());

    service
        .load_default_model()
        .await
        .context("Failed to load default model at startup")?;

    start_server(&config, AppState::new(service)).await
}
