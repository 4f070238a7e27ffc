// SPDX-FileCopyrightText: 2026 Skybridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Skybridge workspace.

use serde::{Deserialize, Serialize};

/// One completed exchange of a conversation, used as bounded context for
/// the completion gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// What the user said.
    pub user: String,
    /// What the assistant answered.
    pub assistant: String,
}

/// Truncates a conversation history to at most `limit` turns, keeping the
/// newest ones. Zero limit empties the history.
pub fn bound_history(mut turns: Vec<ConversationTurn>, limit: usize) -> Vec<ConversationTurn> {
    if turns.len() > limit {
        turns.drain(..turns.len() - limit);
    }
    turns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(n: usize) -> ConversationTurn {
        ConversationTurn {
            user: format!("u{n}"),
            assistant: format!("a{n}"),
        }
    }

    #[test]
    fn bound_history_keeps_newest() {
        let turns = (0..5).map(turn).collect();
        let bounded = bound_history(turns, 2);
        assert_eq!(bounded, vec![turn(3), turn(4)]);
    }

    #[test]
    fn bound_history_leaves_short_history_alone() {
        let turns: Vec<_> = (0..3).map(turn).collect();
        let bounded = bound_history(turns.clone(), 8);
        assert_eq!(bounded, turns);
    }

    #[test]
    fn bound_history_zero_limit_empties() {
        let turns = (0..3).map(turn).collect();
        assert!(bound_history(turns, 0).is_empty());
    }

    #[test]
    fn conversation_turn_round_trips_json() {
        let t = turn(1);
        let json = serde_json::to_string(&t).unwrap();
        let back: ConversationTurn = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
