// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use embed::{
    embed_batch_handler, embed_handler, BatchEmbedBody, BatchEmbedQuery, BatchEmbedResponse,
    EmbedRequest, EmbedResponse,
};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{
    docs_handler, health_handler, models_handler, root_handler, DocsResponse, EndpointDoc,
    HealthResponse, ModelsResponse, RootResponse,
};
pub use http_server::{create_app, start_server, AppState};
