// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Skybridge relay backend.

use thiserror::Error;

/// The primary error type used across the queue, completion gateway, and
/// HTTP surface.
///
/// The first five variants map one-to-one onto HTTP statuses at the API
/// boundary: `Validation` is 400, `Auth` is 401, `NotFound` is 404,
/// `Conflict` is 409, and `Upstream` propagates the upstream status while
/// `UpstreamUnreachable` becomes 502.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Malformed or missing required input (empty text, missing query param).
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or incorrect shared secret.
    #[error("authentication failed")]
    Auth,

    /// No message with the given id exists in the queue.
    #[error("message not found: {id}")]
    NotFound { id: String },

    /// Acknowledgment by a client that does not hold the claim, or
    /// re-acknowledgment of an already-consumed message.
    #[error("message {id} is not acknowledgeable by this client")]
    Conflict {
        id: String,
        /// The identity currently recorded on the claim, if any.
        claimed_by: Option<String>,
    },

    /// The completion API answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The completion API could not be reached at all.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Configuration errors (missing API key, invalid header value).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
