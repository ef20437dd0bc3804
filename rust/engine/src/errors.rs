use thiserror::Error;

use crate::cards::Card;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid hand size: expected {expected} cards, got {actual}")]
    InvalidHandSize { expected: &'static str, actual: usize },
    #[error("Duplicate card: {0}")]
    DuplicateCard(Card),
    #[error("Unknown rank in card token {0:?}")]
    UnknownRank(String),
    #[error("Unknown card token {0:?}")]
    UnknownCard(String),
    #[error("Insufficient deck: need {needed} cards, only {available} remain")]
    InsufficientDeck { needed: usize, available: usize },
    #[error("Shoe exhausted")]
    ExhaustedShoe,
    #[error("Trial count must be >= 1")]
    InvalidTrialCount,
    #[error("Opponent count must be >= 1")]
    InvalidOpponentCount,
    #[error("Simulation cancelled before any trial completed")]
    Cancelled,
}
