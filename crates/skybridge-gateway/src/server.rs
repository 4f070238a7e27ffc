// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and server bootstrap.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use skybridge_core::RelayError;
use skybridge_openai::CompletionClient;
use skybridge_queue::MessageQueue;

use crate::{chat, detector};

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The claimable message queue behind the detector endpoints.
    pub queue: Arc<MessageQueue>,
    /// Upstream completion client behind the chat endpoints.
    pub completions: CompletionClient,
    /// Shared secret for /push and /ack.
    pub detector_key: String,
    /// Maximum prior turns forwarded upstream per chat request.
    pub history_limit: usize,
    /// SSE heartbeat interval.
    pub heartbeat: Duration,
}

/// Server bind configuration (mirrors the `[server]` config section).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the full relay router.
///
/// Every route carries permissive CORS so browser and Unity WebRequest
/// clients on any origin can reach it; the detector key is the only
/// protection and only on the mutating detector routes.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ]);

    Router::new()
        .route("/health", get(chat::health))
        .route("/chat", post(chat::chat))
        .route("/chat-sse", get(chat::chat_sse))
        .route("/push", post(detector::push))
        .route("/latest", get(detector::latest))
        .route("/ack", post(detector::ack))
        .route("/_debug/list", get(detector::debug_list))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds to the configured address and serves the relay until shutdown.
pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), RelayError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RelayError::Internal(format!("failed to bind relay to {addr}: {e}")))?;

    tracing::info!("relay server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| RelayError::Internal(format!("relay server error: {e}")))?;

    Ok(())
}
