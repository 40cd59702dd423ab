// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the embedding service
//!
//! Load failures and inference failures are kept apart so callers can tell
//! a model that never became resident from a resident model that rejected
//! its input.

use thiserror::Error;

/// Errors produced while loading a model or generating embeddings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    /// The named model could not be constructed (unknown id, download
    /// failure, unsupported format)
    #[error("failed to load model '{model}': {message}")]
    ModelLoad { model: String, message: String },

    /// The resident model failed to transform the given input
    #[error("{message}")]
    Encoding { message: String },

    /// A batch request carried no texts
    #[error("texts must contain at least one item")]
    EmptyBatch,
}

impl EmbeddingError {
    pub fn model_load(model: impl Into<String>, error: &anyhow::Error) -> Self {
        EmbeddingError::ModelLoad {
            model: model.into(),
            message: format!("{:#}", error),
        }
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        EmbeddingError::Encoding {
            message: message.into(),
        }
    }

    pub fn is_model_load(&self) -> bool {
        matches!(self, EmbeddingError::ModelLoad { .. })
    }
}
