// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-to-response mapping for the detector relay endpoints.
//!
//! Detector clients parse a fixed JSON error shape: `{ok: false, err:
//! "<code>"}` with a `claimedBy` field on claim conflicts. The chat
//! endpoints use plain-text error bodies instead and map their errors in
//! their own handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use skybridge_core::RelayError;

/// Error returned by detector relay handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Required body fields are missing.
    BadArgs,
    /// A queue or auth failure with a wire code of its own.
    Relay(RelayError),
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        ApiError::Relay(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadArgs => (
                StatusCode::BAD_REQUEST,
                json!({"ok": false, "err": "badargs"}),
            ),
            ApiError::Relay(err) => match err {
                RelayError::Auth => (
                    StatusCode::UNAUTHORIZED,
                    json!({"ok": false, "err": "auth"}),
                ),
                RelayError::Validation(_) => (
                    StatusCode::BAD_REQUEST,
                    json!({"ok": false, "err": "empty"}),
                ),
                RelayError::NotFound { .. } => (
                    StatusCode::NOT_FOUND,
                    json!({"ok": false, "err": "notfound"}),
                ),
                RelayError::Conflict { claimed_by, .. } => (
                    StatusCode::CONFLICT,
                    json!({"ok": false, "err": "not-claimed-by-client", "claimedBy": claimed_by}),
                ),
                other => {
                    tracing::error!(error = %other, "unexpected relay failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({"ok": false, "err": "internal"}),
                    )
                }
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_maps_to_401() {
        let response = ApiError::from(RelayError::Auth).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn conflict_maps_to_409() {
        let response = ApiError::from(RelayError::Conflict {
            id: "x".into(),
            claimed_by: Some("other".into()),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn bad_args_maps_to_400() {
        let response = ApiError::BadArgs.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
