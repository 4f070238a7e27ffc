// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request types for the Responses API.

use serde::Serialize;

use skybridge_core::ConversationTurn;

/// One role/content entry of the `input` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputItem {
    pub role: String,
    pub content: String,
}

impl InputItem {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `POST /v1/responses`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputItem>,
    /// Omitted entirely for non-streaming requests.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

/// Assembles the input array: system prompt first, then any prior turns in
/// order, then the current user message.
pub fn build_input(
    system_prompt: &str,
    history: &[ConversationTurn],
    user_text: &str,
) -> Vec<InputItem> {
    let mut input = Vec::with_capacity(2 + history.len() * 2);
    input.push(InputItem::new("system", system_prompt));
    for turn in history {
        input.push(InputItem::new("user", turn.user.clone()));
        input.push(InputItem::new("assistant", turn.assistant.clone()));
    }
    input.push(InputItem::new("user", user_text));
    input
}
