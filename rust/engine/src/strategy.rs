//! Blackjack hand valuation and the basic-strategy decision table.
//!
//! The table has one row per hand shape (pair rank, soft total, hard total)
//! and one column per dealer upcard value, 2 through 11 (Ace). It is a plain
//! `static`, so any number of threads can read it without locking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{parse_cards, Card};
use crate::errors::EngineError;

/// A recommended blackjack move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    Stand,
    Hit,
    /// Double if the table allows it, otherwise hit.
    Double,
    Split,
    /// Double if the table allows it, otherwise stand.
    DoubleElseStand,
}

impl Action {
    /// Short chart code: `S`, `H`, `D`, `P` or `DS`.
    pub fn code(self) -> &'static str {
        match self {
            Action::Stand => "S",
            Action::Hit => "H",
            Action::Double => "D",
            Action::Split => "P",
            Action::DoubleElseStand => "DS",
        }
    }

    /// Collapses the doubling choices once the caller knows whether doubling
    /// is permitted. Other actions pass through unchanged.
    pub fn resolve(self, can_double: bool) -> Action {
        match (self, can_double) {
            (Action::Double, false) => Action::Hit,
            (Action::DoubleElseStand, true) => Action::Double,
            (Action::DoubleElseStand, false) => Action::Stand,
            (a, _) => a,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Stand => "Stand",
            Action::Hit => "Hit",
            Action::Double => "Double Down",
            Action::Split => "Split",
            Action::DoubleElseStand => "Double Down if allowed, otherwise Stand",
        };
        f.write_str(name)
    }
}

/// Blackjack total after Ace reduction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HandValue {
    pub total: u8,
    /// An Ace is still being counted as 11.
    pub soft: bool,
}

/// Sums the hand with Aces as 11, then drops Aces to 1 one at a time while
/// the total is over 21.
pub fn hand_value(cards: &[Card]) -> HandValue {
    let mut total: u32 = 0;
    let mut high_aces = 0u32;
    for c in cards {
        let v = c.rank.blackjack_value();
        if v == 11 {
            high_aces += 1;
        }
        total += u32::from(v);
    }
    while total > 21 && high_aces > 0 {
        total -= 10;
        high_aces -= 1;
    }
    HandValue {
        total: total.min(u32::from(u8::MAX)) as u8,
        soft: high_aces > 0,
    }
}

pub fn hand_total(cards: &[Card]) -> u8 {
    hand_value(cards).total
}

/// Which strategy row a hand reads from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HandShape {
    /// Two cards of equal rank, keyed by their blackjack value (Ace = 11).
    Pair(u8),
    Soft(u8),
    Hard(u8),
}

impl HandShape {
    pub fn classify(cards: &[Card]) -> HandShape {
        let value = hand_value(cards);
        match cards {
            [a, b] if a.rank == b.rank => HandShape::Pair(a.rank.blackjack_value()),
            _ if value.soft && value.total > 12 => HandShape::Soft(value.total),
            _ => HandShape::Hard(value.total),
        }
    }
}

type Row = [Action; 10];

/// Decision table indexed by hand shape and dealer upcard value.
#[derive(Debug)]
pub struct StrategyTable {
    /// Hard totals 4 through 21.
    hard: [Row; 18],
    /// Soft totals 13 through 21.
    soft: [Row; 9],
    /// Pair values 2 through 11.
    pairs: [Row; 10],
}

const S: Action = Action::Stand;
const H: Action = Action::Hit;
const D: Action = Action::Double;
const P: Action = Action::Split;
const DS: Action = Action::DoubleElseStand;

//                         dealer:  2   3   4   5   6   7   8   9  10   A
pub static BASIC_STRATEGY: StrategyTable = StrategyTable {
    hard: [
        [H, H, H, H, H, H, H, H, H, H], // 4
        [H, H, H, H, H, H, H, H, H, H], // 5
        [H, H, H, H, H, H, H, H, H, H], // 6
        [H, H, H, H, H, H, H, H, H, H], // 7
        [H, H, H, H, H, H, H, H, H, H], // 8
        [H, D, D, D, D, H, H, H, H, H], // 9
        [D, D, D, D, D, D, D, D, H, H], // 10
        [D, D, D, D, D, D, D, D, D, H], // 11
        [H, H, S, S, S, H, H, H, H, H], // 12
        [S, S, S, S, S, H, H, H, H, H], // 13
        [S, S, S, S, S, H, H, H, H, H], // 14
        [S, S, S, S, S, H, H, H, H, H], // 15
        [S, S, S, S, S, H, H, H, H, H], // 16
        [S, S, S, S, S, S, S, S, S, S], // 17
        [S, S, S, S, S, S, S, S, S, S], // 18
        [S, S, S, S, S, S, S, S, S, S], // 19
        [S, S, S, S, S, S, S, S, S, S], // 20
        [S, S, S, S, S, S, S, S, S, S], // 21
    ],
    soft: [
        [H, H, H, D, D, H, H, H, H, H],      // 13
        [H, H, H, D, D, H, H, H, H, H],      // 14
        [H, H, D, D, D, H, H, H, H, H],      // 15
        [H, H, D, D, D, H, H, H, H, H],      // 16
        [H, D, D, D, D, H, H, H, H, H],      // 17
        [DS, DS, DS, DS, DS, S, S, H, H, H], // 18
        [S, S, S, S, S, S, S, S, S, S],      // 19
        [S, S, S, S, S, S, S, S, S, S],      // 20
        [S, S, S, S, S, S, S, S, S, S],      // 21
    ],
    pairs: [
        [P, P, P, P, P, P, H, H, H, H], // 2s
        [P, P, P, P, P, P, H, H, H, H], // 3s
        [H, H, H, H, H, H, H, H, H, H], // 4s
        [D, D, D, D, D, D, D, D, H, H], // 5s
        [P, P, P, P, P, H, H, H, H, H], // 6s
        [P, P, P, P, P, P, H, H, H, H], // 7s
        [P, P, P, P, P, P, P, P, P, P], // 8s
        [P, P, P, P, P, S, P, P, S, S], // 9s
        [S, S, S, S, S, S, S, S, S, S], // tens
        [P, P, P, P, P, P, P, P, P, P], // aces
    ],
};

impl StrategyTable {
    /// Raw table entry. Totals below the table hit, totals above it stand.
    pub fn lookup(&self, shape: HandShape, dealer_value: u8) -> Action {
        let col = usize::from(dealer_value.clamp(2, 11) - 2);
        let (rows, first, key): (&[Row], u8, u8) = match shape {
            HandShape::Pair(v) => (&self.pairs[..], 2, v),
            HandShape::Soft(t) => (&self.soft[..], 13, t),
            HandShape::Hard(t) => (&self.hard[..], 4, t),
        };
        if key < first {
            return H;
        }
        rows.get(usize::from(key - first)).map_or(S, |row| row[col])
    }
}

/// Recommends a move for `player` against the dealer's `upcard`, returning
/// the move and the player's current total.
///
/// Pairs read the pair rows, soft totals above 12 the soft rows, everything
/// else the hard rows. A hard 17 or more, or a busted hand, always stands.
///
/// # Errors
///
/// [`EngineError::InvalidHandSize`] if `player` is empty.
///
/// # Examples
///
/// ```
/// use cardsense_engine::cards::parse_cards;
/// use cardsense_engine::strategy::{recommend, Action};
///
/// let hand = parse_cards(&["8S", "8D"]).unwrap();
/// let upcard = "KH".parse().unwrap();
/// assert_eq!(recommend(&hand, upcard).unwrap(), (Action::Split, 16));
/// ```
pub fn recommend(player: &[Card], upcard: Card) -> Result<(Action, u8), EngineError> {
    if player.is_empty() {
        return Err(EngineError::InvalidHandSize {
            expected: "at least 1",
            actual: 0,
        });
    }
    let value = hand_value(player);
    let shape = HandShape::classify(player);
    let mut action = BASIC_STRATEGY.lookup(shape, upcard.rank.blackjack_value());
    if (value.total >= 17 && !value.soft) || value.total > 21 {
        action = Action::Stand;
    }
    Ok((action, value.total))
}

/// [`recommend`] over raw card tokens.
pub fn recommend_tokens<S: AsRef<str>>(
    player: &[S],
    upcard: &str,
) -> Result<(Action, u8), EngineError> {
    let hand = parse_cards(player)?;
    recommend(&hand, upcard.parse()?)
}
