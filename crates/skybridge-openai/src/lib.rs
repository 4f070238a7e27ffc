// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the OpenAI Responses API.
//!
//! Provides [`CompletionClient`] for one-shot completions and delta
//! streaming, plus the lenient payload extraction the upstream's shifting
//! response shapes require. This layer does not retry; callers decide what
//! an upstream failure means for them.

pub mod client;
pub mod extract;
pub mod stream;
pub mod types;

pub use client::{CompletionClient, CompletionSettings};
pub use stream::StreamChunk;
pub use types::{InputItem, ResponsesRequest};
