//! Contributions, pot size, showdown winners and per-player payoffs.
//!
//! Payoffs are signed chip deltas in player-list order and always sum to
//! zero: whatever the winners take out is exactly what everyone put in.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::cards::{community_tokens, hole_tokens, Card};
use crate::errors::ProcessingError;
use crate::game::Hand;
use crate::hand::{compare_hands, evaluate_cards, HandStrength};
use crate::player::{ActionEntry, PlayerAction};

/// Everything the payoff computation decided about a hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// `stack_size - stack` per player
    pub contributions: Vec<i64>,
    /// Sum of contributions
    pub pot: i64,
    /// Player-list indices still in the hand
    pub active: Vec<usize>,
    /// Player-list indices sharing the pot
    pub winners: Vec<usize>,
    pub payoffs: Vec<i64>,
}

pub fn contributions(hand: &Hand) -> Result<Vec<i64>, ProcessingError> {
    hand.players
        .iter()
        .map(|p| {
            hand.stack_size
                .checked_sub(p.stack)
                .ok_or(ProcessingError::Overflow {
                    stage: "contributions",
                })
        })
        .collect()
}

fn checked_total(amounts: &[i64], stage: &'static str) -> Result<i64, ProcessingError> {
    amounts
        .iter()
        .try_fold(0i64, |acc, &x| acc.checked_add(x))
        .ok_or(ProcessingError::Overflow { stage })
}

/// Resolves who is still in the hand by log position.
///
/// The n-th action of the log is attributed to seat `n % player_count`, so a
/// fold removes that seat regardless of the id written in the token.
pub fn resolve_active(actions: &[ActionEntry], player_count: usize) -> BTreeSet<usize> {
    let mut active: BTreeSet<usize> = (0..player_count).collect();
    if player_count == 0 {
        return active;
    }
    for (pos, entry) in actions.iter().enumerate() {
        if entry.action == PlayerAction::Fold {
            let seat = pos % player_count;
            if active.remove(&seat) {
                debug!(seat, "seat folded");
            }
        }
    }
    active
}

/// Splits `pot` into `winners` shares; earlier winners take the odd chips.
pub fn split_pot(pot: i64, winners: usize) -> Vec<i64> {
    if winners == 0 {
        return Vec::new();
    }
    let n = winners as i64;
    let share = pot.div_euclid(n);
    let remainder = pot.rem_euclid(n) as usize;
    (0..winners)
        .map(|i| if i < remainder { share + 1 } else { share })
        .collect()
}

/// Finds the best hand among `active` seats; all seats tying it win.
pub fn showdown_winners(
    hand: &Hand,
    active: &BTreeSet<usize>,
) -> Result<Vec<usize>, ProcessingError> {
    let board = parse_board(&hand.community_cards)?;

    let mut best: Option<HandStrength> = None;
    let mut winners = Vec::new();
    for &seat in active {
        let Some(player) = hand.players.get(seat) else {
            continue;
        };
        let mut cards = parse_hole(player.id, &player.cards)?;
        cards.extend_from_slice(&board);
        let strength = evaluate_cards(&cards);
        debug!(seat, player_id = player.id, ?strength, "showdown hand");

        let ord = best
            .as_ref()
            .map(|b| compare_hands(&strength, b))
            .unwrap_or(Ordering::Greater);
        match ord {
            Ordering::Greater => {
                best = Some(strength);
                winners.clear();
                winners.push(seat);
            }
            Ordering::Equal => winners.push(seat),
            Ordering::Less => {}
        }
    }
    Ok(winners)
}

/// Computes contributions, the winners and every player's payoff.
pub fn settle(hand: &Hand, actions: &[ActionEntry]) -> Result<Settlement, ProcessingError> {
    let contributions = contributions(hand)?;
    let pot = checked_total(&contributions, "pot")?;
    let active = resolve_active(actions, hand.players.len());

    let winners: Vec<usize> = match active.len() {
        0 => return Err(ProcessingError::NoActivePlayers),
        1 => {
            info!(seat = ?active.first(), "single winner by fold");
            active.iter().copied().collect()
        }
        _ => showdown_winners(hand, &active)?,
    };
    if winners.is_empty() {
        return Err(ProcessingError::NoActivePlayers);
    }

    let shares = split_pot(pot, winners.len());
    let payoffs = contributions
        .iter()
        .enumerate()
        .map(|(seat, &put_in)| {
            let won = match winners.iter().position(|&w| w == seat) {
                Some(i) => shares[i],
                None => 0,
            };
            won.checked_sub(put_in)
                .ok_or(ProcessingError::Overflow { stage: "payoffs" })
        })
        .collect::<Result<Vec<i64>, _>>()?;

    let sum = checked_total(&payoffs, "payoffs")?;
    if sum != 0 {
        return Err(ProcessingError::Unbalanced { sum });
    }

    Ok(Settlement {
        contributions,
        pot,
        active: active.into_iter().collect(),
        winners,
        payoffs,
    })
}

fn parse_hole(player_id: u32, cards: &str) -> Result<Vec<Card>, ProcessingError> {
    let tokens = hole_tokens(cards).ok_or_else(|| ProcessingError::MalformedHoleCards {
        player_id,
        card: cards.to_string(),
    })?;
    tokens
        .iter()
        .map(|t| {
            t.parse().map_err(|_| ProcessingError::MalformedHoleCards {
                player_id,
                card: t.clone(),
            })
        })
        .collect()
}

fn parse_board(board: &str) -> Result<Vec<Card>, ProcessingError> {
    community_tokens(board)
        .into_iter()
        .map(|t| {
            t.parse()
                .map_err(|_| ProcessingError::MalformedBoard { card: t.clone() })
        })
        .collect()
}
