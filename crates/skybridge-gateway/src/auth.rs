// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret check for the detector endpoints.
//!
//! The detector process may present the key either as an `x-api-key`
//! header or as a `key` field in the JSON body; the header wins when both
//! are present. Only `/push` and `/ack` are protected. This is a
//! deployment-perimeter secret, not user auth.

use axum::http::HeaderMap;

use skybridge_core::RelayError;

/// Validates the presented key against the configured one.
pub fn verify_key(
    headers: &HeaderMap,
    body_key: Option<&str>,
    expected: &str,
) -> Result<(), RelayError> {
    let presented = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .or(body_key);

    match presented {
        Some(key) if key == expected => Ok(()),
        _ => Err(RelayError::Auth),
    }
}
