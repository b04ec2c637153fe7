use thiserror::Error;

/// A submitted hand is malformed or breaks a game rule.
///
/// Validation stops at the first violated rule, so a hand yields at most one
/// of these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Hand ID is required")]
    MissingHandId,
    #[error("Players list cannot be empty")]
    NoPlayers,
    #[error("Number of players must be between {min} and {max}, got {count}")]
    PlayerCount { count: usize, min: usize, max: usize },
    #[error("Stack size must be positive")]
    NonPositiveStackSize { stack_size: i64 },
    #[error("Duplicate player ID: {player_id}")]
    DuplicatePlayerId { player_id: u32 },
    #[error("Player {player_id} has negative stack")]
    NegativeStack { player_id: u32 },
    #[error("Player {player_id} has no position")]
    MissingPosition { player_id: u32 },
    #[error("Invalid position '{position}' for player {player_id}")]
    InvalidPosition { player_id: u32, position: String },
    #[error("Duplicate position: {position}")]
    DuplicatePosition { player_id: u32, position: String },
    #[error("Missing required positions: {missing}")]
    MissingRequiredPositions { missing: String },
    #[error("Player {player_id} has invalid number of cards")]
    InvalidHoleCards { player_id: u32 },
    #[error("Invalid card for player {player_id}: {reason}")]
    InvalidCard { player_id: u32, reason: String },
    #[error("Duplicate card: {card}")]
    DuplicateCard { player_id: u32, card: String },
    #[error("Invalid number of community cards: {count}")]
    CommunityCardCount { count: usize },
    #[error("Invalid community card: {reason}")]
    InvalidCommunityCard { reason: String },
    #[error("Duplicate community card: {card}")]
    DuplicateCommunityCard { card: String },
    #[error("Actions list cannot be empty")]
    EmptyActions,
    #[error("Invalid action format: {token}")]
    InvalidActionFormat { token: String },
    #[error("Action from folded player: {player_id}")]
    FoldedPlayerAction { player_id: u32 },
    #[error("Action from invalid player: {player_id}")]
    UnknownPlayerAction { player_id: u32 },
    #[error("Invalid action type: {action}")]
    InvalidActionType { player_id: u32, action: String },
    #[error("Invalid raise format: {token}")]
    InvalidRaiseFormat { player_id: u32, token: String },
    #[error("Action from last remaining player: {player_id}")]
    LastPlayerAction { player_id: u32 },
    #[error("Invalid raise amount: {amount} (must exceed {last_raise})")]
    InvalidRaiseAmount {
        player_id: u32,
        amount: u64,
        last_raise: u64,
    },
    #[error("Too many betting rounds: {rounds}")]
    TooManyBettingRounds { rounds: usize },
    #[error("Community cards don't match betting rounds: {cards} cards after {rounds} rounds")]
    CommunityCardsMismatch { rounds: usize, cards: usize },
}

impl ValidationError {
    /// The player the violation is attributed to, if any.
    pub fn player_id(&self) -> Option<u32> {
        use ValidationError::*;
        match self {
            DuplicatePlayerId { player_id }
            | NegativeStack { player_id }
            | MissingPosition { player_id }
            | InvalidPosition { player_id, .. }
            | DuplicatePosition { player_id, .. }
            | InvalidHoleCards { player_id }
            | InvalidCard { player_id, .. }
            | DuplicateCard { player_id, .. }
            | FoldedPlayerAction { player_id }
            | UnknownPlayerAction { player_id }
            | InvalidActionType { player_id, .. }
            | InvalidRaiseFormat { player_id, .. }
            | LastPlayerAction { player_id }
            | InvalidRaiseAmount { player_id, .. } => Some(*player_id),
            _ => None,
        }
    }

    /// Name of the hand field the violation was found in.
    pub fn field(&self) -> &'static str {
        use ValidationError::*;
        match self {
            MissingHandId => "hand_id",
            NoPlayers | PlayerCount { .. } | DuplicatePlayerId { .. } | NegativeStack { .. } => {
                "players"
            }
            NonPositiveStackSize { .. } => "stack_size",
            MissingPosition { .. }
            | InvalidPosition { .. }
            | DuplicatePosition { .. }
            | MissingRequiredPositions { .. } => "positions",
            InvalidHoleCards { .. } | InvalidCard { .. } | DuplicateCard { .. } => "cards",
            CommunityCardCount { .. }
            | InvalidCommunityCard { .. }
            | DuplicateCommunityCard { .. }
            | CommunityCardsMismatch { .. } => "community_cards",
            EmptyActions
            | InvalidActionFormat { .. }
            | FoldedPlayerAction { .. }
            | UnknownPlayerAction { .. }
            | InvalidActionType { .. }
            | InvalidRaiseFormat { .. }
            | LastPlayerAction { .. }
            | InvalidRaiseAmount { .. }
            | TooManyBettingRounds { .. } => "actions",
        }
    }
}

/// Evaluation of an already validated hand failed. Always a defect upstream
/// of the evaluator; never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("Malformed action token: {token}")]
    MalformedAction { token: String },
    #[error("Card lookup failed for player {player_id}: {card}")]
    MalformedHoleCards { player_id: u32, card: String },
    #[error("Card lookup failed on the board: {card}")]
    MalformedBoard { card: String },
    #[error("No active players left to award the pot")]
    NoActivePlayers,
    #[error("Payoffs do not balance: sum is {sum}")]
    Unbalanced { sum: i64 },
    #[error("Chip arithmetic overflowed while computing the {stage}")]
    Overflow { stage: &'static str },
}
