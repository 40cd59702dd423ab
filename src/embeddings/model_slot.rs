// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model Slot
//!
//! Holds the single resident embedding model. Loading a model with a
//! different name evicts the previous one; there is no cache of older
//! models.
//!
//! Readers take the `RwLock` read guard just long enough to clone the
//! `Arc` handle, so a request keeps encoding with the model it obtained
//! even if another request replaces the slot meanwhile. Loads are
//! serialized by `load_lock` and re-check the slot after acquiring it, so
//! concurrent requests for the same new model construct it once.

use crate::embeddings::{EmbeddingError, ModelLoader, TextEncoder};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

/// The model currently held by the slot
///
/// Name and encoder live in one value so they are always swapped together.
pub struct ResidentModel {
    name: String,
    encoder: Arc<dyn TextEncoder>,
}

impl ResidentModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encoder(&self) -> Arc<dyn TextEncoder> {
        self.encoder.clone()
    }

    pub fn dimension(&self) -> usize {
        self.encoder.dimension()
    }
}

impl std::fmt::Debug for ResidentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResidentModel")
            .field("name", &self.name)
            .field("dimension", &self.encoder.dimension())
            .finish()
    }
}

/// Observable state of the slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    NoModel,
    ModelResident(String),
}

/// Holds at most one resident model and serializes loads into it
pub struct ModelSlot {
    loader: Arc<dyn ModelLoader>,
    resident: RwLock<Option<Arc<ResidentModel>>>,
    load_lock: Mutex<()>,
}

impl ModelSlot {
    /// Creates an empty slot (`SlotState::NoModel`)
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            resident: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> SlotState {
        match self.resident.read().await.as_ref() {
            Some(model) => SlotState::ModelResident(model.name.clone()),
            None => SlotState::NoModel,
        }
    }

    pub async fn current(&self) -> Option<Arc<ResidentModel>> {
        self.resident.read().await.clone()
    }

    pub async fn current_name(&self) -> Option<String> {
        self.resident
            .read()
            .await
            .as_ref()
            .map(|model| model.name.clone())
    }

    async fn resident_named(&self, name: &str) -> Option<Arc<ResidentModel>> {
        self.resident
            .read()
            .await
            .as_ref()
            .filter(|model| model.name == name)
            .cloned()
    }

    /// Makes `name` the resident model, loading it if necessary
    ///
    /// Returns the handle the caller should encode with. A failed load
    /// leaves the previous model resident.
    pub async fn ensure_loaded(&self, name: &str) -> Result<Arc<ResidentModel>, EmbeddingError> {
        if let Some(model) = self.resident_named(name).await {
            return Ok(model);
        }

        let _load_guard = self.load_lock.lock().await;

        // Another request may have loaded it while we waited
        if let Some(model) = self.resident_named(name).await {
            return Ok(model);
        }

        info!("Loading embedding model: {}", name);
        let encoder = self.loader.load(name).await.map_err(|e| {
            error!("✗ Failed to load model {}: {:#}", name, e);
            EmbeddingError::model_load(name, &e)
        })?;

        let model = Arc::new(ResidentModel {
            name: name.to_string(),
            encoder,
        });

        let previous = self.resident.write().await.replace(model.clone());
        match previous {
            Some(previous) => info!(
                "✓ Loaded model {} ({} dimensions), evicted {}",
                name,
                model.dimension(),
                previous.name
            ),
            None => info!("✓ Loaded model {} ({} dimensions)", name, model.dimension()),
        }

        Ok(model)
    }
}
