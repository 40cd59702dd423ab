// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! POST /embed (one text) and POST /embed_batch (ordered list of texts).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_batch_handler, embed_handler};
pub use request::{BatchEmbedBody, BatchEmbedQuery, EmbedRequest};
pub use response::{BatchEmbedResponse, EmbedResponse};
