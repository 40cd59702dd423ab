// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request types for POST /embed and POST /embed_batch

use serde::{Deserialize, Serialize};

/// Request body for POST /embed
///
/// # Example
/// ```json
/// { "text": "Hello world", "model_name": "BAAI/bge-large-zh-v1.5" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedRequest {
    pub text: String,

    /// Model to use; the service default when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Query string accepted by POST /embed_batch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchEmbedQuery {
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Request body for POST /embed_batch
///
/// Either a bare JSON array of texts (model chosen by the `model_name`
/// query parameter) or an object:
/// ```json
/// { "texts": ["first", "second"], "model_name": "all-MiniLM-L6-v2" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BatchEmbedBody {
    Texts(Vec<String>),
    Request {
        texts: Vec<String>,
        #[serde(default)]
        model_name: Option<String>,
    },
}

impl BatchEmbedBody {
    /// Splits into texts and the effective model name; a name in the body
    /// wins over the query parameter
    pub fn into_parts(self, query: BatchEmbedQuery) -> (Vec<String>, Option<String>) {
        match self {
            BatchEmbedBody::Texts(texts) => (texts, query.model_name),
            BatchEmbedBody::Request { texts, model_name } => {
                (texts, model_name.or(query.model_name))
            }
        }
    }
}
