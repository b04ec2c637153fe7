use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Hand categories recognised at showdown, weakest first.
///
/// Only rank multiplicity is looked at: straights, flushes, full houses and
/// quads are not categories here.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandStrength {
    pub category: Category,
    // grouped ranks first, then kickers; each part high -> low
    pub tiebreak: Vec<u8>,
}

/// Ranks a set of rank values (2..=14, ace high) from hole and board cards.
pub fn evaluate_ranks(ranks: &[u8]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    for &r in ranks {
        if let Some(count) = rank_counts.get_mut(r as usize) {
            *count += 1;
        }
    }
    let (trips, pairs) = classify_multiples(&rank_counts);

    // trips win over any pairs that are also present
    if let Some(&trip) = trips.first() {
        let mut tiebreak = vec![trip];
        tiebreak.extend(descending(ranks.iter().copied().filter(|&r| r != trip)).take(2));
        return HandStrength {
            category: Category::ThreeOfAKind,
            tiebreak,
        };
    }

    if !pairs.is_empty() {
        let category = if pairs.len() == 1 {
            Category::OnePair
        } else {
            Category::TwoPair
        };
        let kicker_count = 5usize.saturating_sub(pairs.len() * 2);
        let mut tiebreak = pairs.clone();
        tiebreak.extend(
            descending(ranks.iter().copied().filter(|r| !pairs.contains(r))).take(kicker_count),
        );
        return HandStrength { category, tiebreak };
    }

    HandStrength {
        category: Category::HighCard,
        tiebreak: descending(ranks.iter().copied()).take(5).collect(),
    }
}

pub fn evaluate_cards(cards: &[Card]) -> HandStrength {
    let ranks: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    evaluate_ranks(&ranks)
}

/// Orders two hands by category, then element-wise by tiebreak.
pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a
            .tiebreak
            .iter()
            .zip(&b.tiebreak)
            .map(|(x, y)| x.cmp(y))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal),
        ord => ord,
    }
}

fn descending(ranks: impl Iterator<Item = u8>) -> impl Iterator<Item = u8> {
    let mut v: Vec<u8> = ranks.collect();
    v.sort_unstable_by(|a, b| b.cmp(a));
    v.into_iter()
}

// (trips, pairs), each high -> low
fn classify_multiples(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>) {
    let mut trips = vec![];
    let mut pairs = vec![];
    for r in (2..=14).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r as u8),
            2 => pairs.push(r as u8),
            _ => {}
        }
    }
    (trips, pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trips_take_two_kickers() {
        let hs = evaluate_ranks(&[9, 9, 9, 14, 3, 12, 5]);
        assert_eq!(hs.category, Category::ThreeOfAKind);
        assert_eq!(hs.tiebreak, vec![9, 14, 12]);
    }

    #[test]
    fn higher_trips_chosen_when_two_present() {
        let hs = evaluate_ranks(&[4, 4, 4, 11, 11, 11, 2]);
        assert_eq!(hs.tiebreak, vec![11, 4, 4]);
    }

    #[test]
    fn one_pair_fills_with_three_kickers() {
        let hs = evaluate_ranks(&[2, 2, 9, 8, 7]);
        assert_eq!(hs.category, Category::OnePair);
        assert_eq!(hs.tiebreak, vec![2, 9, 8, 7]);
    }

    #[test]
    fn two_pair_keeps_one_kicker() {
        let hs = evaluate_ranks(&[13, 13, 5, 5, 14, 3, 2]);
        assert_eq!(hs.category, Category::TwoPair);
        assert_eq!(hs.tiebreak, vec![13, 5, 14]);
    }

    #[test]
    fn three_pairs_leave_no_kicker() {
        let hs = evaluate_ranks(&[13, 13, 5, 5, 9, 9, 2]);
        assert_eq!(hs.category, Category::TwoPair);
        assert_eq!(hs.tiebreak, vec![13, 9, 5]);
    }

    #[test]
    fn high_card_top_five() {
        let hs = evaluate_ranks(&[14, 13, 9, 8, 7, 3, 2]);
        assert_eq!(hs.category, Category::HighCard);
        assert_eq!(hs.tiebreak, vec![14, 13, 9, 8, 7]);
    }

    #[test]
    fn hole_cards_alone_rank() {
        assert_eq!(evaluate_ranks(&[12, 12]).tiebreak, vec![12]);
        assert_eq!(evaluate_ranks(&[12, 4]).tiebreak, vec![12, 4]);
    }

    #[test]
    fn compare_orders_by_category_then_kickers() {
        let pair = evaluate_ranks(&[2, 2, 9, 8, 7]);
        let high = evaluate_ranks(&[14, 13, 9, 8, 7]);
        assert_eq!(compare_hands(&pair, &high), Ordering::Greater);
        assert_eq!(compare_hands(&high, &pair), Ordering::Less);

        let ace_kicker = evaluate_ranks(&[10, 10, 14, 4, 3]);
        let king_kicker = evaluate_ranks(&[10, 10, 13, 4, 3]);
        assert_eq!(compare_hands(&ace_kicker, &king_kicker), Ordering::Greater);
        assert_eq!(compare_hands(&ace_kicker, &ace_kicker), Ordering::Equal);
    }
}
