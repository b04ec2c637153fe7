use serde::{Deserialize, Serialize};

use crate::cards::community_tokens;
use crate::player::Player;

/// A single recorded hand as submitted by a caller.
///
/// The engine never mutates a `Hand`; [`crate::validation::validate`] and
/// [`crate::engine::evaluate`] only read it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    /// Opaque hand identifier
    pub hand_id: String,
    /// Starting stack of every player
    pub stack_size: i64,
    /// Seats in table order
    pub players: Vec<Player>,
    /// Whitespace-separated action log, e.g. `"1:raise,50 2:call 3:fold"`
    pub actions: String,
    /// Board cards, `"7h 8h 9h"` or `"7h8h9h"`
    #[serde(default)]
    pub community_cards: String,
    /// Pot as declared by the caller; payoffs are computed from stacks instead
    #[serde(default)]
    pub pot: i64,
    /// Caller supplied display strings, passed through when no better
    /// rendering can be derived
    #[serde(default)]
    pub stack_info: String,
    #[serde(default)]
    pub positions: String,
    #[serde(default)]
    pub hole_cards: String,
}

impl Hand {
    pub fn action_tokens(&self) -> impl Iterator<Item = &str> {
        self.actions.split_whitespace()
    }

    pub fn board_tokens(&self) -> Vec<String> {
        community_tokens(&self.community_cards)
    }
}

/// A hand together with its settled payoffs.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    pub hand_id: String,
    pub stack_size: i64,
    pub players: Vec<Player>,
    pub actions: String,
    pub community_cards: String,
    /// `"Stack <stack_size>"`
    pub stack_info: String,
    pub positions: String,
    pub hole_cards: String,
    /// The declared pot, unchanged
    pub pot: i64,
    /// One signed amount per player, in player-list order; sums to zero
    pub payoffs: Vec<i64>,
}

impl HandResult {
    pub fn payoff_for(&self, player_id: u32) -> Option<i64> {
        self.players
            .iter()
            .position(|p| p.id == player_id)
            .and_then(|i| self.payoffs.get(i).copied())
    }
}
