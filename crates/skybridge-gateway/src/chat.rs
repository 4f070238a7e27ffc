// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat relay handlers.
//!
//! POST /chat returns the whole answer as plain text. GET /chat-sse streams
//! it as SSE frames, each carrying one JSON-escaped delta string, with
//! comment heartbeats for networks that drop idle connections and a
//! terminal `data: [DONE]` frame the client keys its end-of-answer on.
//! GET /health is a fixed liveness probe.

use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;

use skybridge_core::{bound_history, ConversationTurn, RelayError};
use skybridge_openai::StreamChunk;

use crate::server::AppState;

/// Body of POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: Option<String>,
    /// Prior turns supplied by the client; truncated to the configured
    /// limit before the upstream call.
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

/// Query string of GET /chat-sse.
#[derive(Debug, Deserialize)]
pub struct ChatSseQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

/// POST /chat: one-shot completion, plain text out.
pub async fn chat(State(state): State<AppState>, Json(body): Json<ChatRequest>) -> Response {
    let text = body.text.unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return (StatusCode::BAD_REQUEST, "No text").into_response();
    }

    let history = bound_history(body.history, state.history_limit);

    match state.completions.complete(text, &history).await {
        Ok(answer) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            answer,
        )
            .into_response(),
        Err(RelayError::Upstream { status, body }) => {
            // Pass the upstream's own status and body through unchanged.
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, body).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "completion call failed");
            (StatusCode::BAD_GATEWAY, format!("Upstream error: {err}")).into_response()
        }
    }
}

/// GET /chat-sse?q=: streaming completion as SSE delta frames.
pub async fn chat_sse(State(state): State<AppState>, Query(query): Query<ChatSseQuery>) -> Response {
    let q = query.q.unwrap_or_default();
    let q = q.trim().to_string();
    if q.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing q").into_response();
    }

    let chunks = match state.completions.stream(&q, &[]).await {
        Ok(chunks) => chunks,
        Err(RelayError::Upstream { body, .. }) => {
            return (StatusCode::BAD_GATEWAY, format!("Upstream error: {body}")).into_response();
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to open completion stream");
            return (StatusCode::BAD_GATEWAY, format!("Upstream error: {err}")).into_response();
        }
    };

    let events = chunks.filter_map(|item| async move {
        match item {
            // Each delta travels as a JSON string literal so the client can
            // unescape it without guessing about newlines.
            Ok(StreamChunk::Delta(text)) => match serde_json::to_string(&text) {
                Ok(frame) => Some(Ok::<_, Infallible>(Event::default().data(frame))),
                Err(err) => {
                    tracing::warn!(error = %err, "dropping unencodable delta");
                    None
                }
            },
            Ok(StreamChunk::Done) => Some(Ok(Event::default().data("[DONE]"))),
            // Mid-stream failures end the answer early; the terminal [DONE]
            // still follows from the chunk stream.
            Err(err) => {
                tracing::warn!(error = %err, "upstream stream error");
                None
            }
        }
    });

    Sse::new(events)
        .keep_alive(KeepAlive::new().interval(state.heartbeat).text("ping"))
        .into_response()
}
