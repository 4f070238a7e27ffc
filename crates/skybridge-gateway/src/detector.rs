// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detector relay handlers.
//!
//! POST /push, GET /latest, POST /ack, GET /_debug/list. The JSON field
//! names (`clientId`, `ts`, `claimExpiry`, `dup`) are fixed by the
//! deployed detector and AR client.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use skybridge_core::RelayError;
use skybridge_queue::Message;

use crate::auth::verify_key;
use crate::error::ApiError;
use crate::server::AppState;

/// Body of POST /push.
#[derive(Debug, Deserialize)]
pub struct PushRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// Body of a successful POST /push.
#[derive(Debug, Serialize)]
pub struct PushResponse {
    pub ok: bool,
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dup: Option<bool>,
}

/// Query string of GET /latest.
#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    #[serde(default, rename = "clientId")]
    pub client_id: Option<String>,
}

/// Body of GET /latest. Always 200: either a claimed message or the
/// nothing shape `{id: null, text: "", ts: null}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestResponse {
    pub id: Option<Uuid>,
    pub text: String,
    pub ts: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_expiry: Option<DateTime<Utc>>,
}

impl LatestResponse {
    fn claimed(message: Message) -> Self {
        Self {
            id: Some(message.id),
            text: message.text,
            ts: Some(message.created_at),
            claim_expiry: message.claim_expiry,
        }
    }

    fn nothing() -> Self {
        Self {
            id: None,
            text: String::new(),
            ts: None,
            claim_expiry: None,
        }
    }
}

/// Body of POST /ack.
#[derive(Debug, Deserialize)]
pub struct AckRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "clientId")]
    pub client_id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// POST /push: the detector submits recognized text.
pub async fn push(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PushRequest>,
) -> Result<Json<PushResponse>, ApiError> {
    verify_key(&headers, body.key.as_deref(), &state.detector_key)?;

    let outcome = state.queue.push(body.text.as_deref().unwrap_or(""))?;
    Ok(Json(PushResponse {
        ok: true,
        id: outcome.id,
        dup: outcome.duplicate.then_some(true),
    }))
}

/// GET /latest: a client asks for one message to process and claims it.
pub async fn latest(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Json<LatestResponse> {
    let client_id = query.client_id.as_deref().unwrap_or("unknown");

    match state.queue.claim_next(client_id) {
        Some(message) => Json(LatestResponse::claimed(message)),
        None => Json(LatestResponse::nothing()),
    }
}

/// POST /ack: the claim holder reports the message as processed.
pub async fn ack(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AckRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    verify_key(&headers, body.key.as_deref(), &state.detector_key)?;

    let (Some(id), Some(client_id)) = (body.id.as_deref(), body.client_id.as_deref()) else {
        return Err(ApiError::BadArgs);
    };
    if id.is_empty() || client_id.is_empty() {
        return Err(ApiError::BadArgs);
    }

    // A malformed id cannot name any stored message.
    let id = Uuid::parse_str(id).map_err(|_| RelayError::NotFound { id: id.to_string() })?;

    state.queue.acknowledge(id, client_id)?;
    Ok(Json(json!({"ok": true})))
}

/// GET /_debug/list: dump of every message the queue has seen.
pub async fn debug_list(State(state): State<AppState>) -> Json<Vec<Message>> {
    Json(state.queue.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_shape_matches_the_wire() {
        let json = serde_json::to_value(LatestResponse::nothing()).unwrap();
        assert_eq!(json, json!({"id": null, "text": "", "ts": null}));
    }

    #[test]
    fn push_response_omits_dup_when_fresh() {
        let response = PushResponse {
            ok: true,
            id: Uuid::new_v4(),
            dup: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("dup").is_none());
    }
}
