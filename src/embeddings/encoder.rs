// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encoder and loader traits
//!
//! `TextEncoder` is the capability a loaded model exposes; `ModelLoader`
//! turns a model identifier into one. The model slot only talks to these
//! traits, so the ONNX backend can be swapped for an in-process encoder in
//! tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A loaded sentence-embedding model
///
/// Encoding is CPU-bound and synchronous; async callers run it on the
/// blocking pool.
pub trait TextEncoder: Send + Sync {
    /// Length of every vector this model produces
    fn dimension(&self) -> usize;

    /// Encodes texts in order, one vector per input
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Encodes a single text
    ///
    /// Goes through `encode_batch` so a text encoded alone and as a
    /// one-element batch produces the same vector.
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Encoder returned no embedding"))
    }
}

/// Constructs encoders by model identifier
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn TextEncoder>>;
}
