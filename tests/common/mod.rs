// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared test fixtures: a deterministic in-process encoder and a loader
//! that records every load, so tests never touch the network.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use embedding_service::embeddings::{catalog, EmbeddingService, ModelLoader, TextEncoder};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

/// Hash-seeded pseudo-random embeddings, stable per (model, text)
pub struct HashEncoder {
    name: String,
    dimension: usize,
}

impl HashEncoder {
    pub fn new(name: &str, dimension: usize) -> Self {
        Self {
            name: name.to_string(),
            dimension,
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        self.name.hash(&mut hasher);
        text.hash(&mut hasher);
        let mut seed = hasher.finish();

        (0..self.dimension)
            .map(|i| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407)
                    ^ (i as u64);
                ((seed >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0) as f32
            })
            .collect()
    }
}

impl TextEncoder for HashEncoder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|text| {
                if text.contains("\u{0}") {
                    anyhow::bail!("Tokenization failed: NUL byte in input");
                }
                Ok(self.embed_one(text))
            })
            .collect()
    }
}

/// Loads catalog models (with their declared sizes) and `test/dim-N`
/// names; anything else fails like an unknown hub repository.
#[derive(Default)]
pub struct FakeLoader {
    loads: Mutex<Vec<String>>,
}

impl FakeLoader {
    pub fn load_count(&self) -> usize {
        self.loads.lock().unwrap().len()
    }

    pub fn loaded_names(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelLoader for FakeLoader {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn TextEncoder>> {
        self.loads.lock().unwrap().push(model_name.to_string());

        let dimension = catalog::declared_vector_size(model_name).or_else(|| {
            model_name
                .strip_prefix("test/dim-")
                .and_then(|n| n.parse::<usize>().ok())
        });

        match dimension {
            Some(dimension) => Ok(Arc::new(HashEncoder::new(model_name, dimension))),
            None => anyhow::bail!("Repository not found: {}", model_name),
        }
    }
}

/// Service over a fresh `FakeLoader` with the catalog default model
pub fn service_with_fake_loader() -> (EmbeddingService, Arc<FakeLoader>) {
    let loader = Arc::new(FakeLoader::default());
    let service = EmbeddingService::new(loader.clone(), catalog::DEFAULT_MODEL);
    (service, loader)
}
