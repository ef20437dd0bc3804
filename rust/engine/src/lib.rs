//! # cardsense-engine: Card Game Probability Core
//!
//! Win probabilities and recommended moves for Texas Hold'em and blackjack
//! from partially known hands. Cards arrive as recognised labels from a
//! vision front end; the numbers and moves produced here are consumed by an
//! advisory front end. Every random choice flows through an injected RNG,
//! so any result can be reproduced from its seed.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and token parsing
//! - [`deck`] - Decks and multi-deck shoes with injected-RNG shuffling
//! - [`hand`] - 7-card poker hand evaluation and comparison
//! - [`poker`] - Monte Carlo hold'em equity
//! - [`strategy`] - Blackjack hand totals and the basic-strategy table
//! - [`blackjack`] - Monte Carlo blackjack outcomes for a chosen action
//! - [`sim`] - Trial tallies, stop tokens and parallel batching
//! - [`table`] - Detection de-duplication and seat assignment
//! - [`analyzer`] - One-call analyses driven by [`settings`]
//! - [`logger`] - JSONL analysis records
//! - [`logging`] - tracing subscriber setup
//! - [`errors`] - Error types for engine operations
//!
//! ## Quick Start
//!
//! ```rust
//! use cardsense_engine::cards::parse_cards;
//! use cardsense_engine::hand::{evaluate_hand, Category};
//!
//! // Evaluate a 7-card poker hand
//! let cards = parse_cards(&["AH", "KH", "QH", "JH", "TH", "2C", "3D"]).unwrap();
//! let score = evaluate_hand(&cards).unwrap();
//! assert_eq!(score.category, Category::StraightFlush);
//! ```
//!
//! ## Reproducible Simulation
//!
//! Same seed, same answer:
//!
//! ```rust
//! use cardsense_engine::cards::parse_cards;
//! use cardsense_engine::poker::equity;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let hole = parse_cards(&["QS", "QD"]).unwrap();
//! let board = parse_cards(&["2C", "7H", "KD"]).unwrap();
//! let a = equity(&hole, &board, 2, 1_000, &mut ChaCha20Rng::seed_from_u64(5)).unwrap();
//! let b = equity(&hole, &board, 2, 1_000, &mut ChaCha20Rng::seed_from_u64(5)).unwrap();
//! assert_eq!(a, b);
//! ```
//!
//! ## Blackjack Advice
//!
//! ```rust
//! use cardsense_engine::strategy::{recommend_tokens, Action};
//!
//! let (action, total) = recommend_tokens(&["9S", "7D"], "10C").unwrap();
//! assert_eq!((action, total), (Action::Hit, 16));
//! ```

pub mod analyzer;
pub mod blackjack;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod logging;
pub mod poker;
pub mod settings;
pub mod sim;
pub mod strategy;
pub mod table;
