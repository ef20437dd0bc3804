//! Monte Carlo hold'em equity against random opponent hands.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::EngineError;
use crate::hand::{ensure_distinct, score_hand};
use crate::sim::{run_trials, run_trials_parallel, Outcome, StopToken, Tally};

/// Betting round implied by the number of community cards.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

impl Street {
    pub fn from_board_len(n: usize) -> Street {
        match n {
            0 => Street::Preflop,
            1..=3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }
}

/// Known cards of an equity question: two hole cards, up to five board
/// cards and the number of opponents holding unknown hands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokerSpot {
    hole: [Card; 2],
    board: Vec<Card>,
    opponents: usize,
    /// Cards not yet seen, before any shuffle.
    stub: Deck,
}

impl PokerSpot {
    /// Validates the inputs and computes the unseen deck once.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidHandSize`] unless there are exactly 2 hole cards
    ///   and at most 5 board cards
    /// - [`EngineError::DuplicateCard`] if a card is listed twice
    /// - [`EngineError::InvalidOpponentCount`] if `opponents` is zero
    /// - [`EngineError::InsufficientDeck`] if the unseen cards cannot cover
    ///   every opponent's hand plus the rest of the board
    pub fn new(hole: &[Card], board: &[Card], opponents: usize) -> Result<Self, EngineError> {
        let hole: [Card; 2] = hole.try_into().map_err(|_| EngineError::InvalidHandSize {
            expected: "2",
            actual: hole.len(),
        })?;
        if board.len() > 5 {
            return Err(EngineError::InvalidHandSize {
                expected: "0 to 5",
                actual: board.len(),
            });
        }
        if opponents == 0 {
            return Err(EngineError::InvalidOpponentCount);
        }
        let known: Vec<Card> = hole.iter().chain(board).copied().collect();
        ensure_distinct(&known)?;

        let stub = Deck::full().without(&known);
        let needed = opponents * 2 + (5 - board.len());
        if needed > stub.remaining() {
            return Err(EngineError::InsufficientDeck {
                needed,
                available: stub.remaining(),
            });
        }
        Ok(Self {
            hole,
            board: board.to_vec(),
            opponents,
            stub,
        })
    }

    pub fn hole(&self) -> [Card; 2] {
        self.hole
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn opponents(&self) -> usize {
        self.opponents
    }

    pub fn street(&self) -> Street {
        Street::from_board_len(self.board.len())
    }

    /// Equity from a tally of this spot: wins plus ties shared among every
    /// player at the table.
    pub fn equity_of(&self, tally: &Tally) -> f64 {
        tally.equity(self.opponents + 1)
    }

    /// Deals one random completion and records it.
    ///
    /// Opponents receive two cards each, then the board is filled. The hero
    /// wins only by beating every opponent; a tie needs at least one equal
    /// opponent and nobody better.
    fn play_trial<R: Rng + ?Sized>(&self, rng: &mut R, tally: &mut Tally) -> Result<(), EngineError> {
        let mut deck = self.stub.clone();
        deck.shuffle(rng);

        let opponent_cards = deck.draw(self.opponents * 2)?;
        let mut board = [self.hole[0]; 5];
        board[..self.board.len()].copy_from_slice(&self.board);
        for slot in board[self.board.len()..].iter_mut() {
            *slot = deck.deal_card().ok_or(EngineError::InsufficientDeck {
                needed: 1,
                available: 0,
            })?;
        }

        let seven = |a: Card, b: Card| [a, b, board[0], board[1], board[2], board[3], board[4]];
        let mine = score_hand(&seven(self.hole[0], self.hole[1]));

        let mut tied = false;
        for pair in opponent_cards.chunks_exact(2) {
            let theirs = score_hand(&seven(pair[0], pair[1]));
            if theirs > mine {
                tally.record(Outcome::Loss, 1.0);
                return Ok(());
            }
            tied |= theirs == mine;
        }
        tally.record(if tied { Outcome::Tie } else { Outcome::Win }, 1.0);
        Ok(())
    }
}

/// Estimates the hero's share of the pot over `trials` random completions.
///
/// The result is `wins / trials + ties / trials / (opponents + 1)`.
///
/// # Examples
///
/// ```
/// use cardsense_engine::cards::parse_cards;
/// use cardsense_engine::poker::equity;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let hole = parse_cards(&["AS", "AH"]).unwrap();
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let eq = equity(&hole, &[], 1, 2_000, &mut rng).unwrap();
/// assert!(eq > 0.75 && eq < 0.95);
/// ```
pub fn equity<R: Rng + ?Sized>(
    hole: &[Card],
    board: &[Card],
    opponents: usize,
    trials: u64,
    rng: &mut R,
) -> Result<f64, EngineError> {
    let spot = PokerSpot::new(hole, board, opponents)?;
    let tally = simulate_equity(&spot, trials, rng, None)?;
    Ok(spot.equity_of(&tally))
}

/// Runs the trials on the calling thread with the caller's RNG.
pub fn simulate_equity<R: Rng + ?Sized>(
    spot: &PokerSpot,
    trials: u64,
    rng: &mut R,
    stop: Option<&StopToken>,
) -> Result<Tally, EngineError> {
    let tally = run_trials(trials, stop, |t| spot.play_trial(&mut *rng, t))?;
    log_result(spot, &tally);
    Ok(tally)
}

/// Runs the trials across the rayon pool; reproducible for a given `seed`.
pub fn par_simulate_equity(
    spot: &PokerSpot,
    trials: u64,
    seed: u64,
    stop: Option<&StopToken>,
) -> Result<Tally, EngineError> {
    let tally = run_trials_parallel(trials, seed, stop, |rng, t| spot.play_trial(rng, t))?;
    log_result(spot, &tally);
    Ok(tally)
}

fn log_result(spot: &PokerSpot, tally: &Tally) {
    tracing::debug!(
        hole = %format!("{}{}", spot.hole[0], spot.hole[1]),
        board = spot.board.len(),
        opponents = spot.opponents,
        trials = tally.trials,
        equity = spot.equity_of(tally),
        "poker equity simulated"
    );
}
