// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embeddings Module
//!
//! Loads sentence-embedding models into a single resident slot and encodes
//! text with them.

pub mod catalog;
pub mod encoder;
pub mod errors;
pub mod hub;
pub mod model_slot;
pub mod onnx_model;
pub mod service;

pub use catalog::{CatalogEntry, DEFAULT_MODEL};
pub use encoder::{ModelLoader, TextEncoder};
pub use errors::EmbeddingError;
pub use model_slot::{ModelSlot, ResidentModel, SlotState};
pub use onnx_model::{OnnxEmbeddingModel, OnnxModelLoader};
pub use service::{BatchEmbedding, Embedding, EmbeddingService, ModelListing, ServiceHealth};
