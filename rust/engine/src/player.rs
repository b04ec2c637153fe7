use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A seat at a six-max table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Position {
    /// Button (dealer)
    Button,
    /// Small blind
    SmallBlind,
    /// Big blind
    BigBlind,
    /// Under the gun
    UnderTheGun,
    /// Middle position
    Middle,
    /// Cutoff
    Cutoff,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Button,
        Position::SmallBlind,
        Position::BigBlind,
        Position::UnderTheGun,
        Position::Middle,
        Position::Cutoff,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::UnderTheGun => "UTG",
            Position::Middle => "MP",
            Position::Cutoff => "CO",
        }
    }
}

impl FromStr for Position {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One seat of a submitted hand, exactly as the caller reported it.
///
/// Fields are kept in their wire form so that validation can report the
/// offending text; see [`crate::validation::validate`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Player identifier, unique within the hand
    pub id: u32,
    /// Hole cards, two rank+suit tokens back to back (`"AhKh"`)
    pub cards: String,
    /// Position token (`BTN`, `SB`, `BB`, `UTG`, `MP`, `CO`)
    pub position: String,
    /// Chips left at the end of the hand
    pub stack: i64,
}

impl Player {
    pub fn new(id: u32, position: &str, cards: &str, stack: i64) -> Self {
        Self {
            id,
            cards: cards.to_string(),
            position: position.to_string(),
            stack,
        }
    }
}

/// A decoded betting action.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check
    Check,
    /// Call the current bet
    Call,
    /// Raise to the given amount
    Raise(u64),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("Invalid action format: {0}")]
    Format(String),
    #[error("Invalid action type: {0}")]
    UnknownType(String),
    #[error("Invalid raise format: {0}")]
    RaiseFormat(String),
}

impl FromStr for PlayerAction {
    type Err = ActionParseError;

    /// Decodes the part of a log token after the player id: `fold`, `check`,
    /// `call` or `raise,<amount>`. Anything after a comma on the first three
    /// is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let kind = parts.next().unwrap_or_default();
        match kind {
            "fold" => Ok(PlayerAction::Fold),
            "check" => Ok(PlayerAction::Check),
            "call" => Ok(PlayerAction::Call),
            "raise" => parts
                .next()
                .and_then(|amount| amount.parse::<u64>().ok())
                .map(PlayerAction::Raise)
                .ok_or_else(|| ActionParseError::RaiseFormat(s.to_string())),
            other => Err(ActionParseError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => f.write_str("fold"),
            PlayerAction::Check => f.write_str("check"),
            PlayerAction::Call => f.write_str("call"),
            PlayerAction::Raise(amount) => write!(f, "raise,{}", amount),
        }
    }
}

/// One entry of the action log: who acted and what they did.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub player_id: u32,
    pub action: PlayerAction,
}

/// Splits a log token `"<id>:<action>"` into the player id and the raw action.
pub fn split_token(token: &str) -> Option<(u32, &str)> {
    let mut parts = token.split(':');
    let (id, act) = match (parts.next(), parts.next(), parts.next()) {
        (Some(id), Some(act), None) => (id, act),
        _ => return None,
    };
    id.parse::<u32>().ok().map(|id| (id, act))
}

impl FromStr for ActionEntry {
    type Err = ActionParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (player_id, act) =
            split_token(token).ok_or_else(|| ActionParseError::Format(token.to_string()))?;
        let action = act.parse()?;
        Ok(ActionEntry { player_id, action })
    }
}

impl fmt::Display for ActionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.player_id, self.action)
    }
}

/// Decodes a whole whitespace-separated action log.
pub fn parse_action_log(log: &str) -> Result<Vec<ActionEntry>, ActionParseError> {
    log.split_whitespace().map(str::parse).collect()
}
