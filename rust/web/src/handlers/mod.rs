pub mod hands;
pub mod health;

pub use hands::{get_hand, recent_hands, submit_hand, RecentHandsQuery};
pub use health::health;
