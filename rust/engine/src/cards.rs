use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents one of the four suits in a standard 52-card deck.
/// Written as a single lower-case letter on the wire (`h`, `d`, `c`, `s`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

impl Suit {
    /// Parses a suit letter. Upper-case letters are accepted and normalised.
    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            'h' => Some(Suit::Hearts),
            's' => Some(Suit::Spades),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }
}

/// Represents the rank (face value) of a playing card from Two through Ace.
/// The discriminant is the rank value used by the hand ranker (ace high, 14).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10, written `T`
    Ten,
    /// Jack (11)
    Jack,
    /// Queen (12)
    Queen,
    /// King (13)
    King,
    /// Ace (14)
    Ace,
}

impl Rank {
    /// Parses a rank character. Ranks are case-sensitive: `T`, `J`, `Q`, `K`, `A`.
    pub fn from_char(c: char) -> Option<Rank> {
        match c {
            '2' => Some(Rank::Two),
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

/// A single playing card. Two cards are equal iff rank and suit match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card (Clubs, Diamonds, Hearts, or Spades)
    pub suit: Suit,
    /// The rank of the card (Two through Ace)
    pub rank: Rank,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CardParseError {
    #[error("Invalid card format: {0}")]
    Format(String),
    #[error("Invalid card rank: {0}")]
    Rank(char),
    #[error("Invalid card suit: {0}")]
    Suit(char),
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Parses a two-character token such as `Ah` or `Td`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (rank, suit) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => (r, s),
            _ => return Err(CardParseError::Format(s.to_string())),
        };
        let rank = Rank::from_char(rank).ok_or(CardParseError::Rank(rank))?;
        let suit = Suit::from_char(suit).ok_or(CardParseError::Suit(suit.to_ascii_lowercase()))?;
        Ok(Card { suit, rank })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

/// Splits a player's hole-card string (`"AhKh"`) into its two card tokens.
/// Returns `None` unless the string is exactly four characters long.
pub fn hole_tokens(cards: &str) -> Option<[String; 2]> {
    let chars: Vec<char> = cards.chars().collect();
    if chars.len() != 4 {
        return None;
    }
    Some([chars[..2].iter().collect(), chars[2..].iter().collect()])
}

/// Splits a community-card string into card tokens.
///
/// `"7h 8h 9h"` is split on whitespace; `"7h8h9h"` is cut into consecutive
/// two-character chunks. A trailing odd character becomes its own (invalid)
/// token so that the caller reports it.
pub fn community_tokens(cards: &str) -> Vec<String> {
    if cards.chars().any(char::is_whitespace) {
        return cards.split_whitespace().map(str::to_string).collect();
    }
    let chars: Vec<char> = cards.chars().collect();
    chars.chunks(2).map(|c| c.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_cards() {
        let card: Card = "Ah".parse().unwrap();
        assert_eq!(
            card,
            Card {
                suit: Suit::Hearts,
                rank: Rank::Ace
            }
        );
        assert_eq!(card.to_string(), "Ah");
        // suit is case-insensitive, display is normalised
        assert_eq!("TD".parse::<Card>().unwrap().to_string(), "Td");
    }

    #[test]
    fn rejects_bad_tokens() {
        assert_eq!("1h".parse::<Card>(), Err(CardParseError::Rank('1')));
        assert_eq!("ah".parse::<Card>(), Err(CardParseError::Rank('a')));
        assert_eq!("Ax".parse::<Card>(), Err(CardParseError::Suit('x')));
        assert!(matches!("Ahh".parse::<Card>(), Err(CardParseError::Format(_))));
    }

    #[test]
    fn community_tokens_accepts_both_layouts() {
        assert_eq!(community_tokens("7h 8h 9h"), vec!["7h", "8h", "9h"]);
        assert_eq!(community_tokens("7h8h9hTs"), vec!["7h", "8h", "9h", "Ts"]);
        assert_eq!(community_tokens("7h8"), vec!["7h", "8"]);
        assert!(community_tokens("").is_empty());
    }

    #[test]
    fn hole_tokens_requires_four_chars() {
        assert_eq!(
            hole_tokens("AhKh"),
            Some(["Ah".to_string(), "Kh".to_string()])
        );
        assert_eq!(hole_tokens("AhK"), None);
        assert_eq!(hole_tokens("AhKhQ"), None);
    }
}
