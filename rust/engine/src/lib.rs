//! # showdown-engine: Single-Hand Poker Rules Engine
//!
//! Validates a recorded hand of up to six-handed hold'em and settles it:
//! who is still in, who wins the showdown, and the signed payoff of every
//! player. The engine is pure; it never mutates its input and keeps no state
//! between hands.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and card-string tokenising
//! - [`player`] - Seats, positions and the action log grammar
//! - [`game`] - The submitted `Hand` and the settled `HandResult`
//! - [`validation`] - Structural and rule validation of a hand
//! - [`rules`] - Action log replay and betting-round accounting
//! - [`hand`] - Showdown hand ranking and comparison
//! - [`pot`] - Contributions, winners and payoff settlement
//! - [`engine`] - Evaluation entry point tying the above together
//! - [`logger`] - Record formatting and the JSONL hand journal
//! - [`errors`] - Validation and processing error types
//!
//! ## Quick Start
//!
//! ```rust
//! use showdown_engine::game::Hand;
//! use showdown_engine::player::Player;
//! use showdown_engine::{evaluate, validate};
//!
//! let hand = Hand {
//!     hand_id: "demo".into(),
//!     stack_size: 1000,
//!     players: vec![
//!         Player::new(1, "BTN", "AhKh", 950),
//!         Player::new(2, "SB", "2d2c", 950),
//!         Player::new(3, "BB", "JsQd", 950),
//!     ],
//!     actions: "1:raise,50 2:call 3:call 1:check 2:check 3:check".into(),
//!     community_cards: "7h 8h 9h".into(),
//!     pot: 150,
//!     stack_info: String::new(),
//!     positions: String::new(),
//!     hole_cards: String::new(),
//! };
//!
//! validate(&hand).expect("hand is legal");
//! let result = evaluate(&hand).expect("hand settles");
//! // the pair of twos takes the pot
//! assert_eq!(result.payoffs, vec![-50, 100, -50]);
//! ```
//!
//! ## Hand Ranking
//!
//! Only rank multiplicity is ranked: three of a kind, two pair, one pair and
//! high card. Comparison returns [`std::cmp::Ordering`]:
//!
//! ```rust
//! use std::cmp::Ordering;
//! use showdown_engine::hand::{compare_hands, evaluate_ranks};
//!
//! let pair = evaluate_ranks(&[2, 2, 9, 8, 7]);
//! let high = evaluate_ranks(&[14, 13, 9, 8, 7]);
//! assert_eq!(compare_hands(&pair, &high), Ordering::Greater);
//! ```

pub mod cards;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
pub mod validation;

pub use engine::evaluate;
pub use validation::validate;
