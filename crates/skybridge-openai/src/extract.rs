// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lenient text extraction from Responses API payloads.
//!
//! The upstream has shipped several response shapes across API revisions,
//! and the streaming event bodies vary by event type. Rather than pin one
//! schema, each extractor walks an ordered list of known locations and
//! takes the first hit. Callers treat a miss as "no text here", never as
//! an error.

use serde_json::Value;

/// Extracts the final answer text from a complete (non-streaming) response
/// body.
///
/// Tried in order: the `output_text` convenience field, then the first
/// `content` entry's `text`, a nested `content[0][0].text`, and a plain
/// string `content[0].content`. Returns `None` when no location matches;
/// the caller falls back to the raw body.
pub fn extract_final_text(data: &Value) -> Option<String> {
    if let Some(text) = data.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }

    let content = data.get("content").and_then(Value::as_array)?;
    let first = content.first()?;

    if let Some(text) = first.get("text").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    if let Some(text) = first
        .as_array()
        .and_then(|inner| inner.first())
        .and_then(|c| c.get("text"))
        .and_then(Value::as_str)
    {
        return Some(text.to_string());
    }
    if let Some(text) = first.get("content").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    None
}

/// Extracts an incremental text delta from a streaming event body.
///
/// Tried in order: `output_text_delta`, `delta`, `text`, a string
/// `content`, and `content[0].text`. Empty strings carry nothing and are
/// reported as `None` so the stream skips them.
pub fn extract_delta_text(event: &Value) -> Option<String> {
    for field in ["output_text_delta", "delta", "text"] {
        if let Some(text) = event.get(field).and_then(Value::as_str) {
            return non_empty(text);
        }
    }
    match event.get("content") {
        Some(Value::String(text)) => non_empty(text),
        Some(Value::Array(items)) => items
            .first()
            .and_then(|c| c.get("text"))
            .and_then(Value::as_str)
            .and_then(non_empty),
        _ => None,
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
