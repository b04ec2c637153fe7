use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::{Hand, HandResult};
use crate::player::Position;

/// Most seats a record keeps hole cards for.
pub const MAX_RECORDED_HANDS: usize = 6;

/// Durable row for a settled hand.
///
/// Serialized one per line into the hand journal and served back by the
/// history endpoints.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_id: String,
    /// Starting stack
    pub stack: i64,
    /// Rendered positions line, see [`format_positions`]
    pub positions: String,
    /// Hole cards per seat in table order, at most six
    pub hands: Vec<String>,
    /// Action tokens joined with `:`
    pub actions: String,
    /// Rendered payoffs, see [`format_winnings`]
    pub winnings: String,
    /// Timestamp when the hand was stored (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

impl HandRecord {
    pub fn from_result(result: &HandResult) -> Self {
        Self {
            hand_id: result.hand_id.clone(),
            stack: result.stack_size,
            positions: result.positions.clone(),
            hands: result
                .players
                .iter()
                .take(MAX_RECORDED_HANDS)
                .map(|p| p.cards.clone())
                .filter(|c| !c.is_empty())
                .collect(),
            actions: result.actions.split_whitespace().collect::<Vec<_>>().join(":"),
            winnings: format_winnings(&result.payoffs),
            ts: None,
        }
    }
}

/// Renders payoffs as `"Player 1: +75; Player 2: -25"`, numbering seats
/// from 1 in list order.
pub fn format_winnings(payoffs: &[i64]) -> String {
    payoffs
        .iter()
        .enumerate()
        .map(|(i, &amount)| {
            if amount > 0 {
                format!("Player {}: +{}", i + 1, amount)
            } else {
                format!("Player {}: {}", i + 1, amount)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn format_hole_cards(hand: &Hand) -> String {
    hand.players
        .iter()
        .map(|p| format!("Player {}: {}", p.id, p.cards))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Names the dealer and both blinds, or falls back to the caller's own
/// positions string when one of those seats is not present.
pub fn format_positions(hand: &Hand) -> String {
    let seat = |position: Position| {
        hand.players
            .iter()
            .find(|p| p.position == position.as_str())
            .map(|p| p.id)
    };
    match (
        seat(Position::Button),
        seat(Position::SmallBlind),
        seat(Position::BigBlind),
    ) {
        (Some(btn), Some(sb), Some(bb)) => format!(
            "Dealer: Player {}; Player {} Small blind; Player {} Big blind",
            btn, sb, bb
        ),
        _ => {
            debug!(hand_id = %hand.hand_id, "blind seats incomplete, keeping declared positions");
            hand.positions.clone()
        }
    }
}

pub fn format_stack_info(stack_size: i64) -> String {
    format!("Stack {}", stack_size)
}

/// Appends [`HandRecord`]s to a JSONL journal.
pub struct HandLogger {
    writer: BufWriter<File>,
}

impl HandLogger {
    /// Creates (or truncates) the journal at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        ensure_parent(path.as_ref())?;
        let f = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
        })
    }

    /// Opens the journal at `path` for appending, creating it if needed.
    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        ensure_parent(path.as_ref())?;
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
        })
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(timestamp_now());
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Current UTC time, RFC3339 to the second.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Reads every record of a JSONL journal, skipping blank lines.
pub fn read_journal<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<HandRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: HandRecord = serde_json::from_str(&line)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        records.push(record);
    }
    Ok(records)
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;

    fn sample_hand() -> Hand {
        Hand {
            hand_id: "fmt".into(),
            stack_size: 1000,
            players: vec![
                Player::new(1, "BTN", "AhKh", 950),
                Player::new(2, "SB", "2d2c", 975),
                Player::new(3, "BB", "JsQd", 950),
            ],
            actions: "1:raise,50 2:fold 3:fold".into(),
            community_cards: String::new(),
            pot: 125,
            stack_info: String::new(),
            positions: "declared".into(),
            hole_cards: String::new(),
        }
    }

    #[test]
    fn winnings_signs() {
        assert_eq!(
            format_winnings(&[75, -25, -50]),
            "Player 1: +75; Player 2: -25; Player 3: -50"
        );
        assert_eq!(format_winnings(&[0, 0]), "Player 1: 0; Player 2: 0");
        assert_eq!(format_winnings(&[]), "");
    }

    #[test]
    fn positions_name_dealer_and_blinds() {
        assert_eq!(
            format_positions(&sample_hand()),
            "Dealer: Player 1; Player 2 Small blind; Player 3 Big blind"
        );

        let mut hand = sample_hand();
        hand.players[1].position = "UTG".into();
        assert_eq!(format_positions(&hand), "declared");
    }

    #[test]
    fn hole_cards_line() {
        assert_eq!(
            format_hole_cards(&sample_hand()),
            "Player 1: AhKh; Player 2: 2d2c; Player 3: JsQd"
        );
        assert_eq!(format_stack_info(1000), "Stack 1000");
    }

    #[test]
    fn record_from_result() {
        let hand = sample_hand();
        let result = HandResult {
            hand_id: hand.hand_id.clone(),
            stack_size: hand.stack_size,
            players: hand.players.clone(),
            actions: hand.actions.clone(),
            community_cards: String::new(),
            stack_info: format_stack_info(1000),
            positions: format_positions(&hand),
            hole_cards: format_hole_cards(&hand),
            pot: 125,
            payoffs: vec![75, -25, -50],
        };
        let rec = HandRecord::from_result(&result);
        assert_eq!(rec.stack, 1000);
        assert_eq!(rec.hands, vec!["AhKh", "2d2c", "JsQd"]);
        assert_eq!(rec.actions, "1:raise,50:2:fold:3:fold");
        assert_eq!(rec.winnings, "Player 1: +75; Player 2: -25; Player 3: -50");
        assert!(rec.ts.is_none());
    }
}
