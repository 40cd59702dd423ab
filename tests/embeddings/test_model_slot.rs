// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ModelSlot concurrency and loader interaction
//!
//! Uses a mockall loader to pin exactly how many times construction runs.

use crate::common::HashEncoder;
use async_trait::async_trait;
use embedding_service::embeddings::{ModelLoader, ModelSlot, SlotState, TextEncoder};
use mockall::mock;
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Loader {}

    #[async_trait]
    impl ModelLoader for Loader {
        async fn load(&self, model_name: &str) -> anyhow::Result<Arc<dyn TextEncoder>>;
    }
}

fn encoder(name: &str) -> Arc<dyn TextEncoder> {
    Arc::new(HashEncoder::new(name, 4))
}

#[tokio::test]
async fn test_load_called_once_per_name() {
    let mut loader = MockLoader::new();
    loader
        .expect_load()
        .withf(|name| name == "m1")
        .times(1)
        .returning(|name| Ok(encoder(name)));

    let slot = ModelSlot::new(Arc::new(loader));
    for _ in 0..3 {
        let model = slot.ensure_loaded("m1").await.unwrap();
        assert_eq!(model.name(), "m1");
    }
}

#[tokio::test]
async fn test_load_failure_leaves_slot_empty() {
    let mut loader = MockLoader::new();
    loader
        .expect_load()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("unsupported format")));

    let slot = ModelSlot::new(Arc::new(loader));
    let err = slot.ensure_loaded("bad").await.unwrap_err();

    assert!(err.to_string().contains("unsupported format"));
    assert_eq!(slot.state().await, SlotState::NoModel);
}

/// Loader that takes a while, to force concurrent callers to overlap
struct SlowLoader {
    calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl ModelLoader for SlowLoader {
    async fn load(&self, model_name: &str) -> anyhow::Result<Arc<dyn TextEncoder>> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(encoder(model_name))
    }
}

#[tokio::test]
async fn test_concurrent_requests_construct_once() {
    let loader = Arc::new(SlowLoader {
        calls: Default::default(),
    });
    let slot = Arc::new(ModelSlot::new(loader.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let slot = slot.clone();
            tokio::spawn(async move { slot.ensure_loaded("shared").await })
        })
        .collect();

    let mut models = Vec::new();
    for handle in handles {
        models.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(loader.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(models.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[tokio::test]
async fn test_handle_survives_replacement() {
    let loader = Arc::new(SlowLoader {
        calls: Default::default(),
    });
    let slot = ModelSlot::new(loader);

    let held = slot.ensure_loaded("first").await.unwrap();
    slot.ensure_loaded("second").await.unwrap();

    // The evicted handle is still usable by whoever holds it
    assert_eq!(held.name(), "first");
    let vector = held.encoder().encode("still works").unwrap();
    assert_eq!(vector.len(), 4);
    assert_eq!(slot.current_name().await.as_deref(), Some("second"));
}
