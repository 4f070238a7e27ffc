// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claimable message queue for the detector relay.
//!
//! An ordered, append-only in-memory list of messages with per-message
//! exclusive lease (claim) and acknowledgment (consumption) state. This is
//! a lease-based work queue at the smallest possible scale: one outstanding
//! lease per item, one item claimed per poll, strict ack ownership.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{Message, MessageQueue, PushOutcome, DEFAULT_LEASE_SECS};
