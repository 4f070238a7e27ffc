// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Skybridge relay backend.
//!
//! This crate provides the error taxonomy and the small set of common types
//! shared by the queue, completion gateway, and HTTP surface crates.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RelayError;
pub use types::{bound_history, ConversationTurn};
