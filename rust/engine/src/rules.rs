use std::collections::BTreeSet;
use std::mem;

use tracing::debug;

use crate::errors::ValidationError;
use crate::game::Hand;
use crate::player::{split_token, ActionEntry, ActionParseError, PlayerAction};

/// Preflop, flop, turn and river.
pub const MAX_BETTING_ROUNDS: usize = 4;

/// Board size required once `rounds` betting rounds have closed, or `None`
/// when the round count puts no constraint on the board.
pub fn expected_board_cards(rounds: usize) -> Option<usize> {
    match rounds {
        0 | 1 => None,
        2 => Some(3),
        3 => Some(4),
        4 => Some(5),
        _ => Some(0),
    }
}

/// Outcome of replaying an action log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BettingSummary {
    /// Every closed round, holding the actions that closed it
    pub rounds: Vec<Vec<ActionEntry>>,
    /// Actions of a round still open when the log ended
    pub open_round: Vec<ActionEntry>,
    pub active: BTreeSet<u32>,
    pub folded: BTreeSet<u32>,
}

/// State machine over the action log.
///
/// Players are identified purely by the id written in each token; seating
/// order is not enforced. A round closes as soon as every still-active
/// player, and nobody else, appears in it.
#[derive(Debug, Clone)]
pub struct ActionReplay {
    active: BTreeSet<u32>,
    folded: BTreeSet<u32>,
    current_round: Vec<ActionEntry>,
    last_raise: u64,
    closed: Vec<Vec<ActionEntry>>,
}

impl ActionReplay {
    pub fn new(player_ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            active: player_ids.into_iter().collect(),
            folded: BTreeSet::new(),
            current_round: Vec::new(),
            last_raise: 0,
            closed: Vec::new(),
        }
    }

    pub fn last_raise(&self) -> u64 {
        self.last_raise
    }

    pub fn rounds_closed(&self) -> usize {
        self.closed.len()
    }

    /// Applies one `"<id>:<action>"` token.
    pub fn apply(&mut self, token: &str) -> Result<(), ValidationError> {
        let (player_id, act) =
            split_token(token).ok_or_else(|| ValidationError::InvalidActionFormat {
                token: token.to_string(),
            })?;

        if self.folded.contains(&player_id) {
            return Err(ValidationError::FoldedPlayerAction { player_id });
        }
        if !self.active.contains(&player_id) {
            return Err(ValidationError::UnknownPlayerAction { player_id });
        }

        let action = act.parse::<PlayerAction>().map_err(|err| match err {
            ActionParseError::RaiseFormat(_) => ValidationError::InvalidRaiseFormat {
                player_id,
                token: act.to_string(),
            },
            ActionParseError::UnknownType(action) | ActionParseError::Format(action) => {
                ValidationError::InvalidActionType { player_id, action }
            }
        })?;

        if action == PlayerAction::Fold {
            self.active.remove(&player_id);
            self.folded.insert(player_id);
        }

        // the lone survivor may not act again in the round that left them alone
        if self.active.len() == 1
            && self.active.contains(&player_id)
            && !self.current_round.is_empty()
        {
            return Err(ValidationError::LastPlayerAction { player_id });
        }

        if let PlayerAction::Raise(amount) = action {
            if amount <= self.last_raise {
                return Err(ValidationError::InvalidRaiseAmount {
                    player_id,
                    amount,
                    last_raise: self.last_raise,
                });
            }
            self.last_raise = amount;
        }

        self.current_round.push(ActionEntry { player_id, action });
        self.close_round_if_complete();
        Ok(())
    }

    fn close_round_if_complete(&mut self) {
        if self.current_round.len() < self.active.len() {
            return;
        }
        let acted: BTreeSet<u32> = self.current_round.iter().map(|a| a.player_id).collect();
        if acted == self.active {
            let round = mem::take(&mut self.current_round);
            debug!(
                round = self.closed.len() + 1,
                actions = round.len(),
                "betting round closed"
            );
            self.closed.push(round);
            self.last_raise = 0;
        }
    }

    pub fn finish(self) -> BettingSummary {
        BettingSummary {
            rounds: self.closed,
            open_round: self.current_round,
            active: self.active,
            folded: self.folded,
        }
    }
}

/// Replays the hand's action log, failing on the first illegal action.
pub fn validate_actions(hand: &Hand) -> Result<BettingSummary, ValidationError> {
    let mut tokens = hand.action_tokens().peekable();
    if tokens.peek().is_none() {
        return Err(ValidationError::EmptyActions);
    }
    let mut replay = ActionReplay::new(hand.players.iter().map(|p| p.id));
    for token in tokens {
        replay.apply(token)?;
    }
    Ok(replay.finish())
}

/// Checks the closed-round count against the board that was dealt.
pub fn validate_betting_rounds(
    hand: &Hand,
    summary: &BettingSummary,
) -> Result<(), ValidationError> {
    let rounds = summary.rounds.len();
    if rounds > MAX_BETTING_ROUNDS {
        return Err(ValidationError::TooManyBettingRounds { rounds });
    }
    if hand.community_cards.is_empty() {
        return Ok(());
    }
    let cards = hand.board_tokens().len();
    match expected_board_cards(rounds) {
        Some(expected) if expected != cards => {
            Err(ValidationError::CommunityCardsMismatch { rounds, cards })
        }
        _ => Ok(()),
    }
}
