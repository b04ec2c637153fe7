//! Structural and rule validation of a submitted [`Hand`].
//!
//! Rules are checked in a fixed order and the first violation is returned:
//! hand id, player count, starting stack, player ids and stacks, positions,
//! hole cards, community cards, the action log, and finally the betting
//! rounds against the board.

use std::collections::HashSet;

use tracing::warn;

use crate::cards::{hole_tokens, Card, CardParseError};
use crate::errors::ValidationError;
use crate::game::Hand;
use crate::player::{Player, Position};
use crate::rules::{validate_actions, validate_betting_rounds};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;
/// Board sizes that can occur: none, flop, turn, river.
pub const VALID_BOARD_SIZES: [usize; 4] = [0, 3, 4, 5];

/// Validates a hand, failing fast on the first violated rule.
///
/// # Examples
///
/// ```
/// use showdown_engine::game::Hand;
/// use showdown_engine::player::Player;
/// use showdown_engine::validation::validate;
///
/// let hand = Hand {
///     hand_id: "h1".into(),
///     stack_size: 1000,
///     players: vec![
///         Player::new(1, "BTN", "AhKh", 950),
///         Player::new(2, "BB", "2d2c", 950),
///     ],
///     actions: "1:raise,50 2:call".into(),
///     community_cards: String::new(),
///     pot: 100,
///     stack_info: String::new(),
///     positions: String::new(),
///     hole_cards: String::new(),
/// };
/// assert!(validate(&hand).is_ok());
/// ```
pub fn validate(hand: &Hand) -> Result<(), ValidationError> {
    check(hand).map_err(|err| {
        warn!(hand_id = %hand.hand_id, field = err.field(), reason = %err, "hand rejected");
        err
    })
}

fn check(hand: &Hand) -> Result<(), ValidationError> {
    if hand.hand_id.is_empty() {
        return Err(ValidationError::MissingHandId);
    }
    if hand.players.is_empty() {
        return Err(ValidationError::NoPlayers);
    }
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&hand.players.len()) {
        return Err(ValidationError::PlayerCount {
            count: hand.players.len(),
            min: MIN_PLAYERS,
            max: MAX_PLAYERS,
        });
    }
    if hand.stack_size <= 0 {
        return Err(ValidationError::NonPositiveStackSize {
            stack_size: hand.stack_size,
        });
    }

    validate_players(&hand.players)?;
    validate_positions(&hand.players)?;
    validate_cards(hand)?;

    let summary = validate_actions(hand)?;
    validate_betting_rounds(hand, &summary)
}

fn validate_players(players: &[Player]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for player in players {
        if !ids.insert(player.id) {
            return Err(ValidationError::DuplicatePlayerId {
                player_id: player.id,
            });
        }
        if player.stack < 0 {
            return Err(ValidationError::NegativeStack {
                player_id: player.id,
            });
        }
    }
    Ok(())
}

fn validate_positions(players: &[Player]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for player in players {
        if player.position.is_empty() {
            return Err(ValidationError::MissingPosition {
                player_id: player.id,
            });
        }
        let position: Position =
            player
                .position
                .parse()
                .map_err(|_| ValidationError::InvalidPosition {
                    player_id: player.id,
                    position: player.position.clone(),
                })?;
        if !seen.insert(position) {
            return Err(ValidationError::DuplicatePosition {
                player_id: player.id,
                position: player.position.clone(),
            });
        }
    }

    if players.len() >= MIN_PLAYERS {
        let missing: Vec<&str> = [Position::Button, Position::BigBlind]
            .into_iter()
            .filter(|p| !seen.contains(p))
            .map(Position::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingRequiredPositions {
                missing: missing.join(", "),
            });
        }
    }
    Ok(())
}

fn validate_cards(hand: &Hand) -> Result<(), ValidationError> {
    let mut used: HashSet<Card> = HashSet::new();

    for player in &hand.players {
        let tokens = hole_tokens(&player.cards).ok_or(ValidationError::InvalidHoleCards {
            player_id: player.id,
        })?;
        for token in &tokens {
            let card: Card = token.parse().map_err(|err: CardParseError| {
                ValidationError::InvalidCard {
                    player_id: player.id,
                    reason: err.to_string(),
                }
            })?;
            if !used.insert(card) {
                return Err(ValidationError::DuplicateCard {
                    player_id: player.id,
                    card: card.to_string(),
                });
            }
        }
    }

    if hand.community_cards.is_empty() {
        return Ok(());
    }
    let board = hand.board_tokens();
    if !VALID_BOARD_SIZES.contains(&board.len()) {
        return Err(ValidationError::CommunityCardCount { count: board.len() });
    }
    for token in &board {
        let card: Card = token
            .parse()
            .map_err(|err: CardParseError| ValidationError::InvalidCommunityCard {
                reason: err.to_string(),
            })?;
        if !used.insert(card) {
            return Err(ValidationError::DuplicateCommunityCard {
                card: card.to_string(),
            });
        }
    }
    Ok(())
}
