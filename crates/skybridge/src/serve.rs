// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `skybridge serve` command implementation.
//!
//! Wires the claimable message queue, the upstream completion client, and
//! the HTTP relay together from configuration and runs the server until
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use skybridge_config::model::SkybridgeConfig;
use skybridge_core::RelayError;
use skybridge_gateway::{start_server, AppState, ServerConfig};
use skybridge_openai::{CompletionClient, CompletionSettings};
use skybridge_queue::{MessageQueue, SystemClock};

/// Runs the `skybridge serve` command.
pub async fn run_serve(config: SkybridgeConfig) -> Result<(), RelayError> {
    init_tracing(&config.server.log_level);

    info!("starting skybridge serve");

    if config.detector.api_key == "mysecret" {
        warn!("detector.api_key is the development default; override it for real deployments");
    }

    let api_key = match config.openai.api_key.clone() {
        Some(key) => key,
        None => std::env::var("OPENAI_API_KEY").unwrap_or_default(),
    };
    if api_key.is_empty() {
        warn!("no OpenAI API key configured; chat endpoints will fail upstream auth");
    }

    let system_prompt = config
        .chat
        .resolve_system_prompt()
        .map_err(|e| RelayError::Config(format!("failed to read system prompt file: {e}")))?;

    let completions = CompletionClient::new(CompletionSettings {
        api_key,
        model: config.openai.model.clone(),
        base_url: config.openai.base_url.clone(),
        system_prompt,
        include_history: config.openai.include_history,
    })?;

    let queue = Arc::new(MessageQueue::new(
        Arc::new(SystemClock),
        chrono::Duration::seconds(config.detector.lease_secs),
    ));

    let state = AppState {
        queue,
        completions,
        detector_key: config.detector.api_key.clone(),
        history_limit: config.chat.history_limit,
        heartbeat: Duration::from_secs(config.chat.heartbeat_secs),
    };

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    start_server(&server_config, state).await
}

/// Initializes the tracing subscriber from the configured log level.
///
/// `RUST_LOG` wins when set, so operators can raise verbosity for a
/// single run without touching the config file.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("skybridge={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
