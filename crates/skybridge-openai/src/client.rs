// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Responses API.
//!
//! Provides [`CompletionClient`] which handles request construction,
//! bearer authentication, and both the one-shot and streaming call paths.
//! Failures surface immediately; retry policy belongs to the caller.

use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use skybridge_core::{ConversationTurn, RelayError};

use crate::extract::extract_final_text;
use crate::stream::{self, StreamChunk};
use crate::types::{build_input, ResponsesRequest};

/// Everything needed to construct a [`CompletionClient`].
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub system_prompt: String,
    /// When false, prior turns handed to the client are left out of the
    /// upstream request.
    pub include_history: bool,
}

/// Client for upstream completion calls.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
    system_prompt: String,
    include_history: bool,
}

impl CompletionClient {
    /// Creates a client with the given settings.
    pub fn new(settings: CompletionSettings) -> Result<Self, RelayError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", settings.api_key);
        headers.insert(
            "authorization",
            HeaderValue::from_str(&bearer)
                .map_err(|e| RelayError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| RelayError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            model: settings.model,
            base_url: settings.base_url,
            system_prompt: settings.system_prompt,
            include_history: settings.include_history,
        })
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, text: &str, history: &[ConversationTurn], streaming: bool) -> ResponsesRequest {
        let history = if self.include_history { history } else { &[] };
        ResponsesRequest {
            model: self.model.clone(),
            input: build_input(&self.system_prompt, history, text),
            stream: streaming,
        }
    }

    /// Requests a complete answer and returns its text.
    ///
    /// A non-success upstream status is an `Upstream` error carrying the
    /// status and body. On success the answer text is pulled from the body
    /// leniently; when no known location matches, the raw body itself is
    /// returned rather than failing the call.
    pub async fn complete(
        &self,
        text: &str,
        history: &[ConversationTurn],
    ) -> Result<String, RelayError> {
        let req = self.request(text, history, false);

        let response = self
            .client
            .post(&self.base_url)
            .json(&req)
            .send()
            .await
            .map_err(|e| RelayError::UpstreamUnreachable(format!("completion request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        let body = response
            .text()
            .await
            .map_err(|e| RelayError::UpstreamUnreachable(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(extract_final_text(&value).unwrap_or(body)),
            Err(_) => Ok(body),
        }
    }

    /// Opens a streaming completion and returns the chunk stream.
    ///
    /// A non-success status while opening is an `Upstream` error; errors
    /// after the stream is open arrive as stream items.
    pub async fn stream(
        &self,
        text: &str,
        history: &[ConversationTurn],
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamChunk, RelayError>> + Send>>, RelayError>
    {
        let req = self.request(text, history, true);

        let response = self
            .client
            .post(&self.base_url)
            .json(&req)
            .send()
            .await
            .map_err(|e| RelayError::UpstreamUnreachable(format!("streaming request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, "streaming response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(stream::parse_completion_stream(response))
    }
}
