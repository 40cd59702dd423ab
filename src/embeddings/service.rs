// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding Service
//!
//! Request-level operations over the model slot: make sure the requested
//! model is resident, then encode. Encoding runs on the blocking pool.

use crate::embeddings::catalog::{self, CatalogEntry};
use crate::embeddings::{EmbeddingError, ModelLoader, ModelSlot, ResidentModel, SlotState};
use std::sync::Arc;
use tracing::{debug, error};

/// Result of encoding one text
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub embedding: Vec<f32>,
    pub model_name: String,
    pub vector_size: usize,
}

/// Result of encoding a batch of texts
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEmbedding {
    pub embeddings: Vec<Vec<f32>>,
    pub model_name: String,
    pub vector_size: usize,
    pub batch_size: usize,
}

/// Catalog plus the resident model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelListing {
    pub models: Vec<CatalogEntry>,
    pub current_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceHealth {
    pub model_loaded: bool,
    pub current_model: Option<String>,
}

pub struct EmbeddingService {
    slot: ModelSlot,
    default_model: String,
}

impl EmbeddingService {
    pub fn new(loader: Arc<dyn ModelLoader>, default_model: impl Into<String>) -> Self {
        Self {
            slot: ModelSlot::new(loader),
            default_model: default_model.into(),
        }
    }

    /// Model used when a request does not name one
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub async fn state(&self) -> SlotState {
        self.slot.state().await
    }

    /// Loads the configured default model
    pub async fn load_default_model(&self) -> Result<Arc<ResidentModel>, EmbeddingError> {
        let name = self.default_model.clone();
        self.ensure_model_loaded(&name).await
    }

    pub async fn ensure_model_loaded(&self, name: &str) -> Result<Arc<ResidentModel>, EmbeddingError> {
        self.slot.ensure_loaded(name).await
    }

    pub async fn embed_one(
        &self,
        text: &str,
        model_name: Option<&str>,
    ) -> Result<Embedding, EmbeddingError> {
        let model = self
            .ensure_model_loaded(model_name.unwrap_or(&self.default_model))
            .await?;

        let encoder = model.encoder();
        let text = text.to_string();
        let embedding = tokio::task::spawn_blocking(move || encoder.encode(&text))
            .await
            .map_err(|e| EmbeddingError::encoding(format!("Encoding task failed: {}", e)))?
            .map_err(|e| {
                error!("Embedding generation failed with {}: {:#}", model.name(), e);
                EmbeddingError::encoding(format!("{:#}", e))
            })?;

        debug!("Encoded 1 text with {} ({} dims)", model.name(), embedding.len());

        Ok(Embedding {
            vector_size: embedding.len(),
            embedding,
            model_name: model.name().to_string(),
        })
    }

    /// Encodes `texts` in order
    ///
    /// An empty batch is rejected with `EmbeddingError::EmptyBatch` before
    /// any model is loaded.
    pub async fn embed_batch(
        &self,
        texts: Vec<String>,
        model_name: Option<&str>,
    ) -> Result<BatchEmbedding, EmbeddingError> {
        if texts.is_empty() {
            return Err(EmbeddingError::EmptyBatch);
        }

        let model = self
            .ensure_model_loaded(model_name.unwrap_or(&self.default_model))
            .await?;

        let batch_size = texts.len();
        let encoder = model.encoder();
        let embeddings = tokio::task::spawn_blocking(move || encoder.encode_batch(&texts))
            .await
            .map_err(|e| EmbeddingError::encoding(format!("Encoding task failed: {}", e)))?
            .map_err(|e| {
                error!("Batch embedding failed with {}: {:#}", model.name(), e);
                EmbeddingError::encoding(format!("{:#}", e))
            })?;

        if embeddings.len() != batch_size {
            return Err(EmbeddingError::encoding(format!(
                "Encoder returned {} embeddings for {} texts",
                embeddings.len(),
                batch_size
            )));
        }

        let vector_size = embeddings.first().map(Vec::len).unwrap_or(0);
        debug!(
            "Encoded {} texts with {} ({} dims)",
            batch_size,
            model.name(),
            vector_size
        );

        Ok(BatchEmbedding {
            embeddings,
            model_name: model.name().to_string(),
            vector_size,
            batch_size,
        })
    }

    /// The static catalog, independent of the resident model
    pub async fn list_models(&self) -> ModelListing {
        ModelListing {
            models: catalog::available_models(),
            current_model: self.slot.current_name().await,
        }
    }

    pub async fn health(&self) -> ServiceHealth {
        let current_model = self.slot.current_name().await;
        ServiceHealth {
            model_loaded: current_model.is_some(),
            current_model,
        }
    }
}
