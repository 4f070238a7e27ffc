// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The claimable message store.
//!
//! Concurrency model: a single `Mutex` guards the message list, and every
//! operation holds it for its entire scan-and-mutate duration. There is no
//! await point inside an operation, so two pollers can never claim the same
//! message. Messages are never deleted; the list grows for the lifetime of
//! the process (an accepted bound, not silently fixed).

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use skybridge_core::RelayError;

use crate::clock::Clock;

/// Lease duration granted to a claimant, in seconds.
pub const DEFAULT_LEASE_SECS: i64 = 60;

/// The unit of work flowing from detector to consumer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier, assigned at creation, immutable.
    pub id: Uuid,
    /// Non-empty content, immutable after creation.
    pub text: String,
    /// Creation timestamp.
    #[serde(rename = "ts")]
    pub created_at: DateTime<Utc>,
    /// Set true exactly once by a successful acknowledgment.
    pub consumed: bool,
    /// Identity of the client holding the current lease, if any.
    pub claimed_by: Option<String>,
    /// Absolute time after which the lease is void, if claimed.
    pub claim_expiry: Option<DateTime<Utc>>,
}

/// Result of a push: the message id, and whether the push was folded into
/// an existing unconsumed duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushOutcome {
    pub id: Uuid,
    pub duplicate: bool,
}

/// Ordered in-memory queue with exclusive claim leases.
///
/// The clock and lease duration are injected so lease expiry is testable
/// with a [`ManualClock`](crate::clock::ManualClock).
pub struct MessageQueue {
    messages: Mutex<Vec<Message>>,
    clock: Arc<dyn Clock>,
    lease: Duration,
}

impl MessageQueue {
    /// Creates a queue with the given clock and lease duration.
    pub fn new(clock: Arc<dyn Clock>, lease: Duration) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            clock,
            lease,
        }
    }

    /// Creates a production queue on the system clock with the default
    /// 60-second lease.
    pub fn with_system_clock() -> Self {
        Self::new(
            Arc::new(crate::clock::SystemClock),
            Duration::seconds(DEFAULT_LEASE_SECS),
        )
    }

    /// Appends a new message, or returns the id of the most recently pushed
    /// message when its text matches and it has not been consumed yet.
    ///
    /// Fails with `Validation` when the text is empty after trimming.
    pub fn push(&self, text: &str) -> Result<PushOutcome, RelayError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RelayError::Validation("text must not be empty".into()));
        }

        let mut messages = self.lock();

        // Dedupe against the latest message only: detectors re-fire the
        // same phrase in bursts, and folding those keeps the consumer from
        // speaking it twice.
        if let Some(last) = messages.last()
            && !last.consumed
            && last.text == text
        {
            tracing::debug!(id = %last.id, "push deduplicated against latest unconsumed");
            return Ok(PushOutcome {
                id: last.id,
                duplicate: true,
            });
        }

        let message = Message {
            id: Uuid::new_v4(),
            text: text.to_string(),
            created_at: self.clock.now(),
            consumed: false,
            claimed_by: None,
            claim_expiry: None,
        };
        let id = message.id;
        tracing::info!(%id, text = %message.text, "message pushed");
        messages.push(message);

        Ok(PushOutcome {
            id,
            duplicate: false,
        })
    }

    /// Claims the oldest eligible message for `client_id` and returns a copy
    /// of it, or `None` when nothing is available (not an error).
    ///
    /// Eligible means unconsumed and either never claimed or holding an
    /// expired lease. The claim records `client_id` and an expiry of
    /// now + lease duration.
    pub fn claim_next(&self, client_id: &str) -> Option<Message> {
        let now = self.clock.now();
        let mut messages = self.lock();

        for message in messages.iter_mut() {
            if message.consumed {
                continue;
            }
            let lease_open = match (&message.claimed_by, message.claim_expiry) {
                (None, _) => true,
                (Some(_), Some(expiry)) => now > expiry,
                // Claimed without expiry should not happen; treat as held.
                (Some(_), None) => false,
            };
            if lease_open {
                message.claimed_by = Some(client_id.to_string());
                message.claim_expiry = Some(now + self.lease);
                tracing::info!(id = %message.id, client_id, "message claimed");
                return Some(message.clone());
            }
        }
        None
    }

    /// Marks a message consumed.
    ///
    /// Only the identity recorded in `claimed_by` may acknowledge, and only
    /// once: a mismatched client (including nobody holding the claim) or an
    /// already-consumed message is a `Conflict`, an unknown id a `NotFound`.
    /// Mismatches never mutate state.
    pub fn acknowledge(&self, id: Uuid, client_id: &str) -> Result<(), RelayError> {
        let mut messages = self.lock();

        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| RelayError::NotFound { id: id.to_string() })?;

        if message.claimed_by.as_deref() != Some(client_id) {
            return Err(RelayError::Conflict {
                id: id.to_string(),
                claimed_by: message.claimed_by.clone(),
            });
        }
        if message.consumed {
            // The lease holder already completed this message once;
            // a second ack signals double processing, not success.
            return Err(RelayError::Conflict {
                id: id.to_string(),
                claimed_by: message.claimed_by.clone(),
            });
        }

        message.consumed = true;
        message.claim_expiry = Some(self.clock.now());
        tracing::info!(%id, client_id, "message acknowledged");
        Ok(())
    }

    /// Returns a copy of the full message list, for diagnostics.
    pub fn snapshot(&self) -> Vec<Message> {
        self.lock().clone()
    }

    /// Number of messages ever pushed (consumed ones included).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Message>> {
        // A poisoned lock means a panic mid-operation; the list may hold a
        // half-applied claim, but continuing beats taking the relay down.
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
