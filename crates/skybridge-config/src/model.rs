// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Skybridge relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Fallback system prompt for the chat relay, tuned for answers an AR
/// avatar speaks aloud.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AR voice assistant speaking to a user through a humanoid avatar in augmented reality. Goals: 1) Be concise, natural, and helpful. Prefer short sentences that sound good aloud. 2) When explaining steps, use simple sequencing (First, Next, Finally). 3) Avoid filler and emojis. No markdown. 4) If you mention actions in the real world, keep them safe and practical.";

/// Top-level Skybridge configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SkybridgeConfig {
    /// Bind address and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Detector relay settings.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Upstream completion service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Chat relay settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Server bind and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Detector relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorConfig {
    /// Shared secret the detector presents on /push and /ack.
    /// The default is a development value; deployments must override it.
    #[serde(default = "default_detector_key")]
    pub api_key: String,

    /// Claim lease duration in seconds.
    #[serde(default = "default_lease_secs")]
    pub lease_secs: i64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            api_key: default_detector_key(),
            lease_secs: default_lease_secs(),
        }
    }
}

fn default_detector_key() -> String {
    "mysecret".to_string()
}

fn default_lease_secs() -> i64 {
    60
}

/// Upstream completion service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to the `OPENAI_API_KEY` environment
    /// variable at startup.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Responses API endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Forward client-supplied conversation turns to the upstream.
    #[serde(default)]
    pub include_history: bool,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            include_history: false,
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1/responses".to_string()
}

/// Chat relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Inline system prompt string. Overridden by `system_prompt_file`
    /// if both are set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the system prompt. Takes precedence
    /// over `system_prompt` if both are set.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Maximum prior turns forwarded upstream per chat request.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// SSE heartbeat interval in seconds.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            system_prompt_file: None,
            history_limit: default_history_limit(),
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

fn default_history_limit() -> usize {
    8
}

fn default_heartbeat_secs() -> u64 {
    25
}

impl ChatConfig {
    /// Resolves the effective system prompt: file contents win over the
    /// inline string, which wins over the built-in default.
    pub fn resolve_system_prompt(&self) -> std::io::Result<String> {
        if let Some(path) = &self.system_prompt_file {
            return std::fs::read_to_string(path).map(|s| s.trim().to_string());
        }
        Ok(self
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = SkybridgeConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.detector.api_key, "mysecret");
        assert_eq!(config.detector.lease_secs, 60);
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1/responses");
        assert!(!config.openai.include_history);
        assert_eq!(config.chat.history_limit, 8);
        assert_eq!(config.chat.heartbeat_secs, 25);
    }

    #[test]
    fn inline_prompt_beats_default() {
        let chat = ChatConfig {
            system_prompt: Some("short prompt".into()),
            ..ChatConfig::default()
        };
        assert_eq!(chat.resolve_system_prompt().unwrap(), "short prompt");
    }

    #[test]
    fn default_prompt_when_nothing_is_set() {
        let chat = ChatConfig::default();
        assert_eq!(chat.resolve_system_prompt().unwrap(), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn missing_prompt_file_errors() {
        let chat = ChatConfig {
            system_prompt_file: Some("/nonexistent/prompt.md".into()),
            ..ChatConfig::default()
        };
        assert!(chat.resolve_system_prompt().is_err());
    }
}
