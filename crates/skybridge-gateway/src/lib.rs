// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP relay surface built on axum.
//!
//! One router serves two halves of the deployment: the detector relay
//! (`/push`, `/latest`, `/ack`, `/_debug/list`) moving recognized phrases
//! from a detector process to a polling AR client, and the chat relay
//! (`/chat`, `/chat-sse`, `/health`) proxying the upstream completion
//! service. Wire shapes are fixed by the deployed clients and kept exactly.

pub mod auth;
pub mod chat;
pub mod detector;
pub mod error;
pub mod server;

pub use error::ApiError;
pub use server::{router, start_server, AppState, ServerConfig};
