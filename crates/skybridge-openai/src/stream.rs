// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE parsing of streaming Responses API bodies.
//!
//! Converts a reqwest byte stream into [`StreamChunk`]s using
//! `eventsource-stream` for SSE framing. Only the `data:` payloads matter:
//! the upstream's event names vary by API revision, so dispatching on them
//! would be fragile. Frames that carry no recognizable delta are skipped.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;

use skybridge_core::RelayError;

use crate::extract::extract_delta_text;

/// Sentinel payload marking the end of an upstream stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One unit of streaming output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// An incremental piece of answer text.
    Delta(String),
    /// The upstream finished; no further chunks follow.
    Done,
}

/// Parses a streaming response body into a stream of [`StreamChunk`]s.
///
/// The `[DONE]` sentinel yields [`StreamChunk::Done`] and ends the stream.
/// An upstream body that ends without the sentinel also yields `Done`, so
/// consumers always observe exactly one terminal chunk. Non-JSON payloads
/// and events without extractable text are dropped silently.
pub fn parse_completion_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<StreamChunk, RelayError>> + Send>> {
    let chunks = response
        .bytes_stream()
        .eventsource()
        .filter_map(|result| async move {
            match result {
                Ok(event) => {
                    let payload = event.data.trim();
                    if payload == DONE_SENTINEL {
                        return Some(Ok(StreamChunk::Done));
                    }
                    let Ok(value) = serde_json::from_str::<Value>(payload) else {
                        tracing::debug!("skipping non-JSON stream payload");
                        return None;
                    };
                    extract_delta_text(&value).map(|text| Ok(StreamChunk::Delta(text)))
                }
                Err(e) => Some(Err(RelayError::UpstreamUnreachable(format!(
                    "stream read failed: {e}"
                )))),
            }
        });

    // Guarantee a single terminal Done whether or not the sentinel arrived,
    // and cut the stream off right after it.
    let terminated = chunks
        .chain(futures::stream::once(async { Ok(StreamChunk::Done) }))
        .scan(false, |finished, item| {
            if *finished {
                return futures::future::ready(None);
            }
            if matches!(item, Ok(StreamChunk::Done)) {
                *finished = true;
            }
            futures::future::ready(Some(item))
        });

    Box::pin(terminated)
}
