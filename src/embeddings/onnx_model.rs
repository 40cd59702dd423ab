// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Sentence Encoder
//!
//! This module wraps ONNX Runtime to run sentence-transformers exports
//! (bge, MiniLM, ...) resolved by [`crate::embeddings::hub`].
//!
//! Features:
//! - ONNX model loading from disk
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - Tokenization with truncation to the model's maximum length
//! - Batch inference with padding
//! - CLS or attention-masked mean pooling, optional L2 normalization
//! - Output dimension probed at load time

use crate::embeddings::hub::{self, ModelFiles, PoolingStrategy};
use crate::embeddings::{ModelLoader, TextEncoder};
use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, ArrayView2, ArrayViewD, Ix2};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokenizers::{Encoding, Tokenizer, TruncationParams};
use tracing::{info, warn};

/// Default truncation length when the tokenizer does not configure one
pub const DEFAULT_MAX_LENGTH: usize = 512;

/// ONNX-based sentence embedding model
///
/// # Thread Safety
/// The session sits behind a `Mutex`; concurrent callers serialize on it.
pub struct OnnxEmbeddingModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    model_name: String,
    dimension: usize,
    pooling: PoolingStrategy,
    normalize: bool,
    /// Whether the graph declares a `token_type_ids` input
    uses_token_type_ids: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("pooling", &self.pooling)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads a model from resolved files
    ///
    /// Blocking. Runs one probe inference to learn the output dimension.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file is missing or invalid
    /// - ONNX Runtime initialization fails
    /// - The graph produces an output of unexpected rank
    pub fn load(model_name: impl Into<String>, files: &ModelFiles, max_length: usize) -> Result<Self> {
        let model_name = model_name.into();

        if !files.model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", files.model_path.display());
        }
        if !files.tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", files.tokenizer_path.display());
        }

        let session = build_session(&files.model_path)?;
        let uses_token_type_ids = session
            .inputs
            .iter()
            .any(|input| input.name == "token_type_ids");

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        if tokenizer.get_truncation().is_none() {
            tokenizer
                .with_truncation(Some(TruncationParams {
                    max_length,
                    ..Default::default()
                }))
                .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;
        }
        tokenizer.with_padding(None);

        let mut model = Self {
            session: Mutex::new(session),
            tokenizer,
            model_name,
            dimension: 0,
            pooling: files.pooling,
            normalize: files.normalize,
            uses_token_type_ids,
        };

        let probe = model
            .run_batch(&["probe".to_string()])
            .context("Probe inference failed")?;
        model.dimension = probe.first().map(Vec::len).unwrap_or(0);
        if model.dimension == 0 {
            anyhow::bail!("Model {} produced an empty embedding", model.model_name);
        }

        info!(
            "✅ ONNX embedding model loaded: {} ({} dimensions, {:?} pooling, normalize={})",
            model.model_name, model.dimension, model.pooling, model.normalize
        );

        Ok(model)
    }

    fn run_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let BatchInputs {
            input_ids,
            attention_mask,
            token_type_ids,
        } = pad_batch(&encodings)?;
        let mask_for_pooling = attention_mask.clone();

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session lock poisoned"))?;

        let outputs = if self.uses_token_type_ids {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)?,
                "attention_mask" => Value::from_array(attention_mask)?,
                "token_type_ids" => Value::from_array(token_type_ids)?
            ])?
        } else {
            session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)?,
                "attention_mask" => Value::from_array(attention_mask)?
            ])?
        };

        // Index [0]: output names differ between exports
        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let mut embeddings = pool_output(output, mask_for_pooling.view(), self.pooling)
            .with_context(|| format!("Unusable output from {}", self.model_name))?;

        if self.normalize {
            for embedding in &mut embeddings {
                l2_normalize(embedding);
            }
        }

        if self.dimension != 0 {
            for (i, emb) in embeddings.iter().enumerate() {
                if emb.len() != self.dimension {
                    anyhow::bail!(
                        "Unexpected embedding dimension at index {}: {} (expected {})",
                        i,
                        emb.len(),
                        self.dimension
                    );
                }
            }
        }

        Ok(embeddings)
    }
}

impl TextEncoder for OnnxEmbeddingModel {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.run_batch(texts)
    }
}

/// Padded `[batch, max_len]` model inputs
#[derive(Debug)]
pub(crate) struct BatchInputs {
    pub input_ids: Array2<i64>,
    pub attention_mask: Array2<i64>,
    pub token_type_ids: Array2<i64>,
}

/// Pads every sequence to the longest one in the batch
///
/// Padding positions get id 0 and mask 0.
pub(crate) fn pad_batch(encodings: &[Encoding]) -> Result<BatchInputs> {
    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);
    let capacity = encodings.len() * max_len;

    let mut input_ids = Vec::with_capacity(capacity);
    let mut attention_mask = Vec::with_capacity(capacity);
    let mut token_type_ids = Vec::with_capacity(capacity);

    for encoding in encodings {
        let ids = encoding.get_ids();
        let padding = max_len - ids.len();

        input_ids.extend(ids.iter().map(|&id| id as i64));
        attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
        token_type_ids.extend(encoding.get_type_ids().iter().map(|&t| t as i64));

        input_ids.extend(std::iter::repeat(0i64).take(padding));
        attention_mask.extend(std::iter::repeat(0i64).take(padding));
        token_type_ids.extend(std::iter::repeat(0i64).take(padding));
    }

    let shape = (encodings.len(), max_len);
    Ok(BatchInputs {
        input_ids: Array2::from_shape_vec(shape, input_ids)
            .context("Failed to create input_ids array")?,
        attention_mask: Array2::from_shape_vec(shape, attention_mask)
            .context("Failed to create attention_mask array")?,
        token_type_ids: Array2::from_shape_vec(shape, token_type_ids)
            .context("Failed to create token_type_ids array")?,
    })
}

/// Turns the model's first output into one vector per batch row
///
/// Rank 2 (`[batch, hidden]`) is already pooled and passes through. Rank 3
/// (`[batch, seq_len, hidden]`) is pooled row by row with that row's mask.
pub(crate) fn pool_output(
    output: ArrayViewD<f32>,
    attention_mask: ArrayView2<i64>,
    pooling: PoolingStrategy,
) -> Result<Vec<Vec<f32>>> {
    match output.ndim() {
        2 => Ok(output.outer_iter().map(|row| row.iter().copied().collect()).collect()),
        3 => {
            if output.shape()[0] != attention_mask.nrows() {
                anyhow::bail!(
                    "Output batch size {} does not match input batch size {}",
                    output.shape()[0],
                    attention_mask.nrows()
                );
            }
            output
                .outer_iter()
                .zip(attention_mask.outer_iter())
                .map(|(item, mask)| {
                    let item = item
                        .into_dimensionality::<Ix2>()
                        .context("Unexpected token embedding shape")?;
                    Ok(match pooling {
                        PoolingStrategy::Cls => cls_pool(item),
                        PoolingStrategy::Mean => mean_pool(item, &mask.to_vec()),
                    })
                })
                .collect()
        }
        rank => anyhow::bail!("Unsupported output rank {}", rank),
    }
}

/// Tries CUDA first, falls back to CPU
fn build_session(model_path: &Path) -> Result<Session> {
    let cuda_result = Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .context("Failed to set CUDA execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(4)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path);

    match cuda_result {
        Ok(session) => {
            info!("CUDA execution provider initialized");
            Ok(session)
        }
        Err(e) => {
            warn!("⚠️  CUDA execution provider failed: {}", e);
            warn!("   Falling back to CPU execution provider");
            Session::builder()
                .context("Failed to create session builder")?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .context("Failed to set CPU execution provider")?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")?
                .with_intra_threads(4)
                .context("Failed to set intra threads")?
                .commit_from_file(model_path)
                .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
        }
    }
}

/// Embedding of the first token
pub fn cls_pool(token_embeddings: ArrayView2<f32>) -> Vec<f32> {
    token_embeddings.row(0).to_vec()
}

/// Mean over tokens, weighted by the attention mask so padding is ignored
pub fn mean_pool(token_embeddings: ArrayView2<f32>, attention_mask: &[i64]) -> Vec<f32> {
    let hidden_dim = token_embeddings.ncols();
    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for (row, &mask) in token_embeddings.outer_iter().zip(attention_mask) {
        let mask = mask as f32;
        sum_mask += mask;
        for (acc, value) in pooled.iter_mut().zip(row.iter()) {
            *acc += value * mask;
        }
    }

    for val in &mut pooled {
        *val /= sum_mask.max(1e-9);
    }
    pooled
}

/// Scales a vector to unit length; zero vectors are left untouched
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Production loader: resolves files through the hub, then builds an
/// [`OnnxEmbeddingModel`] on the blocking pool
#[derive(Debug, Clone)]
pub struct OnnxModelLoader {
    cache_dir: Option<PathBuf>,
    max_length: usize,
}

impl OnnxModelLoader {
    pub fn new(cache_dir: Option<PathBuf>, max_length: usize) -> Self {
        Self {
            cache_dir,
            max_length,
        }
    }
}

impl Default for OnnxModelLoader {
    fn default() -> Self {
        Self::new(None, DEFAULT_MAX_LENGTH)
    }
}

#[async_trait]
impl ModelLoader for OnnxModelLoader {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn TextEncoder>> {
        let model_name = model_name.to_string();
        let cache_dir = self.cache_dir.clone();
        let max_length = self.max_length;

        let model = tokio::task::spawn_blocking(move || {
            let files = hub::resolve_model_files(&model_name, cache_dir.as_deref())?;
            OnnxEmbeddingModel::load(model_name, &files, max_length)
        })
        .await
        .context("Model loading task panicked")??;

        Ok(Arc::new(model))
    }
}
