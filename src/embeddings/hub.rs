// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model file resolution
//!
//! Maps a model identifier to the files the ONNX encoder needs:
//! - an existing local directory is used as-is
//! - anything else is a Hugging Face Hub repository, fetched into the cache
//!   (a bare name such as `all-MiniLM-L6-v2` means
//!   `sentence-transformers/all-MiniLM-L6-v2`)
//!
//! Pooling and normalization come from the sentence-transformers module
//! files (`1_Pooling/config.json`, `modules.json`) when the repository
//! ships them.

use anyhow::{anyhow, Context, Result};
use hf_hub::api::sync::{ApiBuilder, ApiError, ApiRepo};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ONNX_CANDIDATES: [&str; 2] = ["onnx/model.onnx", "model.onnx"];
const TOKENIZER_FILE: &str = "tokenizer.json";
const POOLING_CONFIG_FILE: &str = "1_Pooling/config.json";
const MODULES_FILE: &str = "modules.json";

/// How token embeddings are reduced to one sentence vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolingStrategy {
    /// Embedding of the first ([CLS]) token
    Cls,
    /// Attention-masked mean over all tokens
    #[default]
    Mean,
}

/// Local files backing one model
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub pooling: PoolingStrategy,
    pub normalize: bool,
}

#[derive(Debug, Deserialize)]
struct PoolingConfigFile {
    #[serde(default)]
    pooling_mode_cls_token: bool,
}

#[derive(Debug, Deserialize)]
struct ModuleEntry {
    #[serde(rename = "type")]
    kind: String,
}

/// Repository id used on the Hub for a model identifier
pub fn hub_repo_id(model_name: &str) -> String {
    if model_name.contains('/') {
        model_name.to_string()
    } else {
        format!("sentence-transformers/{}", model_name)
    }
}

/// Resolves a model identifier to local files, downloading when needed
///
/// Any identifier naming an existing directory on this host is read as a
/// local model, including directories that hold no model at all (those
/// fail with "No ONNX model found").
///
/// Blocking: performs filesystem and network I/O.
pub fn resolve_model_files(model_name: &str, cache_dir: Option<&Path>) -> Result<ModelFiles> {
    let local = Path::new(model_name);
    if local.is_dir() {
        debug!("Using local model directory: {}", local.display());
        return resolve_local(local);
    }

    let repo_id = hub_repo_id(model_name);
    info!("Fetching model files from hub: {}", repo_id);

    let mut builder = ApiBuilder::new().with_progress(false);
    if let Some(dir) = cache_dir {
        builder = builder.with_cache_dir(dir.to_path_buf());
    }
    let api = builder.build().context("Failed to initialize hub client")?;
    let repo = api.model(repo_id.clone());

    resolve_remote(&repo, &repo_id)
}

fn resolve_local(dir: &Path) -> Result<ModelFiles> {
    let model_path = ONNX_CANDIDATES
        .iter()
        .map(|candidate| dir.join(candidate))
        .find(|path| path.is_file())
        .ok_or_else(|| anyhow!("No ONNX model found in {}", dir.display()))?;

    let tokenizer_path = dir.join(TOKENIZER_FILE);
    if !tokenizer_path.is_file() {
        anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
    }

    let pooling_path = dir.join(POOLING_CONFIG_FILE);
    let modules_path = dir.join(MODULES_FILE);

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
        pooling: read_pooling(pooling_path.is_file().then_some(pooling_path.as_path()))?,
        normalize: read_normalize(modules_path.is_file().then_some(modules_path.as_path()))?,
    })
}

fn resolve_remote(repo: &ApiRepo, repo_id: &str) -> Result<ModelFiles> {
    let mut model_path = None;
    for candidate in ONNX_CANDIDATES {
        if let Some(path) = fetch_optional(repo, repo_id, candidate)? {
            model_path = Some(path);
            break;
        }
    }
    let model_path = model_path
        .ok_or_else(|| anyhow!("No ONNX export found in repository {}", repo_id))?;

    let tokenizer_path = repo
        .get(TOKENIZER_FILE)
        .with_context(|| format!("Failed to download {} from {}", TOKENIZER_FILE, repo_id))?;

    let pooling_path = fetch_optional(repo, repo_id, POOLING_CONFIG_FILE)?;
    let modules_path = fetch_optional(repo, repo_id, MODULES_FILE)?;

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
        pooling: read_pooling(pooling_path.as_deref())?,
        normalize: read_normalize(modules_path.as_deref())?,
    })
}

/// Fetches a file the repository may legitimately lack
///
/// `Ok(None)` only when the hub answers 404; any other failure aborts the
/// load so a model is never built with guessed settings.
fn fetch_optional(repo: &ApiRepo, repo_id: &str, file: &str) -> Result<Option<PathBuf>> {
    match repo.get(file) {
        Ok(path) => Ok(Some(path)),
        Err(e) if is_missing_file(&e) => {
            debug!("{} not present in {}", file, repo_id);
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to download {} from {}", file, repo_id)),
    }
}

/// True when the hub reported the file as absent (HTTP 404)
pub(crate) fn is_missing_file(error: &ApiError) -> bool {
    match error {
        ApiError::RequestError(inner) => matches!(inner.as_ref(), ureq::Error::Status(404, _)),
        _ => false,
    }
}

fn read_pooling(path: Option<&Path>) -> Result<PoolingStrategy> {
    let Some(path) = path else {
        return Ok(PoolingStrategy::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_pooling(&raw)
}

fn read_normalize(path: Option<&Path>) -> Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_normalize(&raw)
}

pub(crate) fn parse_pooling(raw: &str) -> Result<PoolingStrategy> {
    let config: PoolingConfigFile =
        serde_json::from_str(raw).context("Invalid pooling config")?;
    Ok(if config.pooling_mode_cls_token {
        PoolingStrategy::Cls
    } else {
        PoolingStrategy::Mean
    })
}

pub(crate) fn parse_normalize(raw: &str) -> Result<bool> {
    let modules: Vec<ModuleEntry> = serde_json::from_str(raw).context("Invalid modules.json")?;
    Ok(modules.iter().any(|m| m.kind.ends_with("Normalize")))
}
