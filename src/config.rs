// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every option is a CLI flag that falls back to an environment variable
//! and then to a default.

use crate::embeddings::onnx_model::DEFAULT_MAX_LENGTH;
use crate::embeddings::DEFAULT_MODEL;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8888;

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "embedding-service", version, about = "Local text embedding service")]
pub struct ServiceConfig {
    /// Interface to listen on
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Model loaded at startup and used when a request names none
    #[arg(long, env = "DEFAULT_MODEL", default_value = DEFAULT_MODEL)]
    pub default_model: String,

    /// Where downloaded model files are cached (hf-hub default if unset)
    #[arg(long, env = "MODEL_CACHE_DIR")]
    pub model_cache_dir: Option<PathBuf>,

    /// Token limit applied when the tokenizer does not set one
    #[arg(long, env = "MAX_SEQUENCE_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_sequence_length: usize,
}

impl ServiceConfig {
    /// `host:port`, resolved by the listener (so `localhost` works)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
