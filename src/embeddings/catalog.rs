// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static catalog of known embedding models
//!
//! The catalog is informational: it is what `GET /models` advertises. Any
//! identifier the loader can resolve may still be requested.

use serde::{Deserialize, Serialize};

/// Model loaded at startup when `DEFAULT_MODEL` is not set
pub const DEFAULT_MODEL: &str = "BAAI/bge-large-zh-v1.5";

/// One advertised model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub description: String,
    pub vector_size: usize,
}

const CATALOG: [(&str, &str, usize); 5] = [
    ("BAAI/bge-large-zh-v1.5", "Chinese-optimized large model", 1024),
    ("BAAI/bge-large-en-v1.5", "English-optimized large model", 1024),
    ("BAAI/bge-base-zh-v1.5", "Chinese-optimized base model", 768),
    ("BAAI/bge-small-zh-v1.5", "Chinese-optimized lightweight model", 512),
    ("all-MiniLM-L6-v2", "General-purpose lightweight model", 384),
];

/// Returns the five catalog entries in display order
pub fn available_models() -> Vec<CatalogEntry> {
    CATALOG
        .iter()
        .map(|(name, description, vector_size)| CatalogEntry {
            name: name.to_string(),
            description: description.to_string(),
            vector_size: *vector_size,
        })
        .collect()
}

/// Declared vector size of a catalog model, if listed
pub fn declared_vector_size(model_name: &str) -> Option<usize> {
    CATALOG
        .iter()
        .find(|(name, _, _)| *name == model_name)
        .map(|(_, _, size)| *size)
}
