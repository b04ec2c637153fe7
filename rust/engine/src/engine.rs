use tracing::{debug, error, info, warn};

use crate::errors::ProcessingError;
use crate::game::{Hand, HandResult};
use crate::logger::{format_hole_cards, format_positions, format_stack_info};
use crate::player::{parse_action_log, ActionParseError};
use crate::pot::settle;

/// Evaluates a validated hand and settles every player's payoff.
///
/// The hand must already have passed [`crate::validation::validate`]; anything
/// that still fails to decode here is reported as a [`ProcessingError`].
///
/// # Examples
///
/// ```
/// use showdown_engine::engine::evaluate;
/// use showdown_engine::game::Hand;
/// use showdown_engine::player::Player;
///
/// let hand = Hand {
///     hand_id: "h1".into(),
///     stack_size: 1000,
///     players: vec![
///         Player::new(1, "BTN", "AhKh", 950),
///         Player::new(2, "SB", "2d2c", 975),
///         Player::new(3, "BB", "JsQd", 950),
///     ],
///     actions: "1:raise,50 2:fold 3:fold".into(),
///     community_cards: String::new(),
///     pot: 125,
///     stack_info: String::new(),
///     positions: String::new(),
///     hole_cards: String::new(),
/// };
///
/// let result = evaluate(&hand).unwrap();
/// assert_eq!(result.payoffs, vec![75, -25, -50]);
/// ```
pub fn evaluate(hand: &Hand) -> Result<HandResult, ProcessingError> {
    run(hand).map_err(|err| {
        error!(hand_id = %hand.hand_id, error = %err, "hand evaluation failed");
        err
    })
}

fn run(hand: &Hand) -> Result<HandResult, ProcessingError> {
    info!(hand_id = %hand.hand_id, players = hand.players.len(), "evaluating hand");

    let actions = parse_action_log(&hand.actions).map_err(|err| {
        let token = match err {
            ActionParseError::Format(t)
            | ActionParseError::UnknownType(t)
            | ActionParseError::RaiseFormat(t) => t,
        };
        ProcessingError::MalformedAction { token }
    })?;

    let settlement = settle(hand, &actions)?;
    debug!(contributions = ?settlement.contributions, "player contributions");
    info!(hand_id = %hand.hand_id, pot = settlement.pot, "total pot size");
    debug!(active = ?settlement.active, winners = ?settlement.winners, "pot awarded");
    if hand.pot != settlement.pot {
        warn!(
            hand_id = %hand.hand_id,
            declared = hand.pot,
            computed = settlement.pot,
            "declared pot differs from contributions"
        );
    }
    debug!(payoffs = ?settlement.payoffs, "final payoffs");

    Ok(HandResult {
        hand_id: hand.hand_id.clone(),
        stack_size: hand.stack_size,
        players: hand.players.clone(),
        actions: hand.actions.clone(),
        community_cards: hand.community_cards.clone(),
        stack_info: format_stack_info(hand.stack_size),
        positions: format_positions(hand),
        hole_cards: format_hole_cards(hand),
        pot: hand.pot,
        payoffs: settlement.payoffs,
    })
}
