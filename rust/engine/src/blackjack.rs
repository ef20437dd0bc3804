//! Monte Carlo blackjack outcomes for a chosen action.
//!
//! The player's action resolves into at most one extra card per hand, and
//! the dealer starts from the upcard alone and draws to the house rule. Split
//! hands each take one card and count half a trial apiece.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::EngineError;
use crate::sim::{run_trials, run_trials_parallel, Outcome, StopToken, Tally};
use crate::strategy::{hand_value, Action};

/// Table rules that affect the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRules {
    /// Number of 52-card decks in the shoe.
    pub decks: usize,
    pub dealer_hits_soft_17: bool,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            decks: 4,
            dealer_hits_soft_17: false,
        }
    }
}

/// A player hand facing a dealer upcard, with the visible cards already
/// taken out of a fresh shoe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackjackSpot {
    player: Vec<Card>,
    upcard: Card,
    action: Action,
    rules: HouseRules,
    stub: Deck,
}

impl BlackjackSpot {
    /// # Errors
    ///
    /// - [`EngineError::InvalidHandSize`] for an empty hand, or a split of
    ///   anything but two cards
    /// - [`EngineError::ExhaustedShoe`] if the visible cards include more
    ///   copies of a card than the shoe holds
    pub fn new(
        player: &[Card],
        upcard: Card,
        action: Action,
        rules: HouseRules,
    ) -> Result<Self, EngineError> {
        if player.is_empty() {
            return Err(EngineError::InvalidHandSize {
                expected: "at least 1",
                actual: 0,
            });
        }
        if action == Action::Split && player.len() != 2 {
            return Err(EngineError::InvalidHandSize {
                expected: "2",
                actual: player.len(),
            });
        }
        let mut stub = Deck::shoe(rules.decks);
        for &c in player.iter().chain(std::iter::once(&upcard)) {
            if !stub.remove_one(c) {
                return Err(EngineError::ExhaustedShoe);
            }
        }
        Ok(Self {
            player: player.to_vec(),
            upcard,
            action,
            rules,
            stub,
        })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn rules(&self) -> HouseRules {
        self.rules
    }

    fn play_trial<R: Rng + ?Sized>(&self, rng: &mut R, tally: &mut Tally) -> Result<(), EngineError> {
        let mut shoe = self.stub.clone();
        shoe.shuffle(rng);

        match self.action {
            Action::Split => {
                let (mut left, mut right) = shoe.split_alternate();
                let first = [self.player[0], deal(&mut left)?];
                let second = [self.player[1], deal(&mut right)?];
                let dealer = self.play_dealer(&mut left.chain(right))?;
                tally.record(settle(hand_value(&first).total, dealer), 0.5);
                tally.record(settle(hand_value(&second).total, dealer), 0.5);
            }
            Action::Hit | Action::Double | Action::DoubleElseStand => {
                let mut hand = self.player.clone();
                hand.push(deal(&mut shoe)?);
                let dealer = self.play_dealer(&mut shoe)?;
                tally.record(settle(hand_value(&hand).total, dealer), 1.0);
            }
            Action::Stand => {
                let dealer = self.play_dealer(&mut shoe)?;
                tally.record(settle(hand_value(&self.player).total, dealer), 1.0);
            }
        }
        Ok(())
    }

    /// Draws below 17, and on a soft 17 when the house hits it.
    fn play_dealer(&self, shoe: &mut Deck) -> Result<u8, EngineError> {
        let mut hand = vec![self.upcard];
        loop {
            let value = hand_value(&hand);
            let hits_17 = value.total == 17 && value.soft && self.rules.dealer_hits_soft_17;
            if value.total > 17 || (value.total == 17 && !hits_17) {
                return Ok(value.total);
            }
            hand.push(deal(shoe)?);
        }
    }
}

fn deal(shoe: &mut Deck) -> Result<Card, EngineError> {
    shoe.deal_card().ok_or(EngineError::ExhaustedShoe)
}

/// A busted player loses even when the dealer also busts.
pub fn settle(player: u8, dealer: u8) -> Outcome {
    if player > 21 {
        Outcome::Loss
    } else if dealer > 21 || player > dealer {
        Outcome::Win
    } else if player == dealer {
        Outcome::Tie
    } else {
        Outcome::Loss
    }
}

/// Fraction of `trials` the player wins after taking `action`, under the
/// default [`HouseRules`]. Pushes count as not winning.
///
/// # Examples
///
/// ```
/// use cardsense_engine::blackjack::win_probability;
/// use cardsense_engine::cards::parse_cards;
/// use cardsense_engine::strategy::Action;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let hand = parse_cards(&["KS", "QD"]).unwrap();
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let p = win_probability(&hand, "6H".parse().unwrap(), Action::Stand, 5_000, &mut rng).unwrap();
/// assert!(p > 0.7);
/// ```
pub fn win_probability<R: Rng + ?Sized>(
    player: &[Card],
    upcard: Card,
    action: Action,
    trials: u64,
    rng: &mut R,
) -> Result<f64, EngineError> {
    let spot = BlackjackSpot::new(player, upcard, action, HouseRules::default())?;
    Ok(simulate_outcomes(&spot, trials, rng, None)?.win_rate())
}

/// Runs the trials on the calling thread with the caller's RNG.
pub fn simulate_outcomes<R: Rng + ?Sized>(
    spot: &BlackjackSpot,
    trials: u64,
    rng: &mut R,
    stop: Option<&StopToken>,
) -> Result<Tally, EngineError> {
    let tally = run_trials(trials, stop, |t| spot.play_trial(&mut *rng, t))?;
    log_result(spot, &tally);
    Ok(tally)
}

/// Runs the trials across the rayon pool; reproducible for a given `seed`.
pub fn par_simulate_outcomes(
    spot: &BlackjackSpot,
    trials: u64,
    seed: u64,
    stop: Option<&StopToken>,
) -> Result<Tally, EngineError> {
    let tally = run_trials_parallel(trials, seed, stop, |rng, t| spot.play_trial(rng, t))?;
    log_result(spot, &tally);
    Ok(tally)
}

fn log_result(spot: &BlackjackSpot, tally: &Tally) {
    tracing::debug!(
        upcard = %spot.upcard,
        action = spot.action.code(),
        trials = tally.trials,
        win = tally.win_rate(),
        push = tally.tie_rate(),
        loss = tally.loss_rate(),
        "blackjack outcomes simulated"
    );
}
