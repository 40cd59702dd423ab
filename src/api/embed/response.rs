// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response types for POST /embed and POST /embed_batch

use crate::embeddings::{BatchEmbedding, Embedding};
use serde::{Deserialize, Serialize};

/// Response body for POST /embed
///
/// `vector_size` always equals `embedding.len()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,
    pub model_name: String,
    pub vector_size: usize,
}

/// Response body for POST /embed_batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchEmbedResponse {
    /// One vector per input text, in input order
    pub embeddings: Vec<Vec<f32>>,
    pub model_name: String,
    pub vector_size: usize,
    pub batch_size: usize,
}

impl From<Embedding> for EmbedResponse {
    fn from(result: Embedding) -> Self {
        Self {
            embedding: result.embedding,
            model_name: result.model_name,
            vector_size: result.vector_size,
        }
    }
}

impl From<BatchEmbedding> for BatchEmbedResponse {
    fn from(result: BatchEmbedding) -> Self {
        Self {
            embeddings: result.embeddings,
            model_name: result.model_name,
            vector_size: result.vector_size,
            batch_size: result.batch_size,
        }
    }
}
