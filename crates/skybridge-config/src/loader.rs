// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./skybridge.toml` >
//! `~/.config/skybridge/skybridge.toml` > `/etc/skybridge/skybridge.toml`
//! with environment variable overrides via the `SKYBRIDGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SkybridgeConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/skybridge/skybridge.toml` (system-wide)
/// 3. `~/.config/skybridge/skybridge.toml` (user XDG config)
/// 4. `./skybridge.toml` (local directory)
/// 5. `SKYBRIDGE_*` environment variables
pub fn load_config() -> Result<SkybridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SkybridgeConfig::default()))
        .merge(Toml::file("/etc/skybridge/skybridge.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("skybridge/skybridge.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("skybridge.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SkybridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SkybridgeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SkybridgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SkybridgeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// key names stay intact: `SKYBRIDGE_OPENAI_API_KEY` must map to
/// `openai.api_key`, not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("SKYBRIDGE_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped.
        // Example: SKYBRIDGE_OPENAI_API_KEY -> "openai_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("detector_", "detector.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("chat_", "chat.", 1);
        mapped.into()
    })
}
