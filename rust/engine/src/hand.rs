use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::EngineError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    Trips = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    Quads = 7,
    StraightFlush = 8,
}

/// The value of a best five-card hand out of seven.
///
/// Ordering is lexicographic: category first, then `tiebreak` element-wise.
/// `tiebreak` holds the category's defining ranks followed by kickers, high
/// to low, padded with zeros. Two scores of the same category always use the
/// same number of meaningful slots, so the padding never decides a comparison.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct HandScore {
    pub category: Category,
    pub tiebreak: [u8; 5],
}

/// Scores exactly seven distinct cards.
///
/// # Errors
///
/// - [`EngineError::InvalidHandSize`] unless exactly seven cards are given
/// - [`EngineError::DuplicateCard`] if any card appears twice
///
/// # Examples
///
/// ```
/// use cardsense_engine::cards::parse_cards;
/// use cardsense_engine::hand::{evaluate_hand, Category};
///
/// let cards = parse_cards(&["AH", "2D", "3C", "4S", "5H", "9D", "KC"]).unwrap();
/// let score = evaluate_hand(&cards).unwrap();
/// assert_eq!(score.category, Category::Straight);
/// assert_eq!(score.tiebreak[0], 5);
/// ```
pub fn evaluate_hand(cards: &[Card]) -> Result<HandScore, EngineError> {
    let seven: &[Card; 7] = cards.try_into().map_err(|_| EngineError::InvalidHandSize {
        expected: "7",
        actual: cards.len(),
    })?;
    ensure_distinct(seven)?;
    Ok(score_hand(seven))
}

pub fn compare_hands(a: &HandScore, b: &HandScore) -> Ordering {
    a.cmp(b)
}

pub(crate) fn ensure_distinct(cards: &[Card]) -> Result<(), EngineError> {
    let mut seen = 0u64;
    for &c in cards {
        let bit = 1u64 << c.index();
        if seen & bit != 0 {
            return Err(EngineError::DuplicateCard(c));
        }
        seen |= bit;
    }
    Ok(())
}

/// Scores seven cards already known to be distinct.
pub(crate) fn score_hand(cards: &[Card; 7]) -> HandScore {
    let mut rank_counts = [0u8; 15]; // 2..=14 used
    let mut rank_mask: u16 = 0;
    let mut suit_counts = [0u8; 4];
    let mut suit_masks = [0u16; 4];
    for &c in cards {
        let r = c.rank.value();
        let s = c.suit.index();
        rank_counts[r as usize] += 1;
        rank_mask |= 1u16 << r;
        suit_counts[s] += 1;
        suit_masks[s] |= 1u16 << r;
    }

    // at most one suit can reach five of seven
    let flush_mask = suit_counts
        .iter()
        .position(|&n| n >= 5)
        .map(|s| suit_masks[s]);

    if let Some(high) = flush_mask.and_then(straight_high) {
        return made(Category::StraightFlush, &[high]);
    }

    // (count, rank), most copies first, then highest rank
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let (top_count, top_rank) = groups[0];
    let second = groups.get(1).copied();

    if top_count == 4 {
        return made(Category::Quads, &with_kickers(&[top_rank], rank_mask, 1));
    }
    if let (3, Some((n, pair))) = (top_count, second) {
        if n >= 2 {
            return made(Category::FullHouse, &[top_rank, pair]);
        }
    }
    if let Some(mask) = flush_mask {
        return made(Category::Flush, &ranks_desc(mask, 5));
    }
    if let Some(high) = straight_high(rank_mask) {
        return made(Category::Straight, &[high]);
    }
    if top_count == 3 {
        return made(Category::Trips, &with_kickers(&[top_rank], rank_mask, 2));
    }
    if let (2, Some((2, low_pair))) = (top_count, second) {
        return made(
            Category::TwoPair,
            &with_kickers(&[top_rank, low_pair], rank_mask, 1),
        );
    }
    if top_count == 2 {
        return made(Category::Pair, &with_kickers(&[top_rank], rank_mask, 3));
    }
    made(Category::HighCard, &ranks_desc(rank_mask, 5))
}

fn made(category: Category, ranks: &[u8]) -> HandScore {
    let mut tiebreak = [0u8; 5];
    for (slot, &r) in tiebreak.iter_mut().zip(ranks) {
        *slot = r;
    }
    HandScore { category, tiebreak }
}

/// Defining ranks followed by the `n` highest other ranks present.
fn with_kickers(defining: &[u8], rank_mask: u16, n: usize) -> Vec<u8> {
    let mut rest = rank_mask;
    for &r in defining {
        rest &= !(1u16 << r);
    }
    let mut out = defining.to_vec();
    out.extend(ranks_desc(rest, n));
    out
}

fn ranks_desc(mask: u16, n: usize) -> Vec<u8> {
    (2..=14u8)
        .rev()
        .filter(|&r| mask & (1u16 << r) != 0)
        .take(n)
        .collect()
}

/// Top rank of the best five-card run in `mask`, with the wheel
/// (A-2-3-4-5) counted as a five-high straight.
fn straight_high(mask: u16) -> Option<u8> {
    let mut m = mask;
    if m & (1u16 << 14) != 0 {
        m |= 1u16 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b1_1111u16 << (high - 4);
        m & window == window
    })
}
