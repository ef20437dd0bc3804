//! Trial bookkeeping shared by the poker and blackjack simulators.
//!
//! A simulation is a sequence of independent trials, each recording a
//! weighted [`Outcome`] into a [`Tally`]. Tallies merge by summation, so
//! batches of trials can run on separate threads and be combined in any order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Trials per independently seeded batch in parallel runs.
pub const BATCH_TRIALS: u64 = 1024;

/// How often a running simulation looks at its [`StopToken`].
const STOP_POLL_INTERVAL: u64 = 64;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Tie,
    Loss,
}

/// Weighted win/tie/loss counts over `trials` completed trials.
///
/// Weights are fractional because a split blackjack hand contributes two
/// half-weighted outcomes to one trial.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: f64,
    pub ties: f64,
    pub losses: f64,
    pub trials: u64,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome, weight: f64) {
        match outcome {
            Outcome::Win => self.wins += weight,
            Outcome::Tie => self.ties += weight,
            Outcome::Loss => self.losses += weight,
        }
    }

    pub fn merge(&mut self, other: &Tally) {
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
        self.trials += other.trials;
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn tie_rate(&self) -> f64 {
        self.rate(self.ties)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    /// Win rate plus each tie credited as a `1 / split_ways` share.
    pub fn equity(&self, split_ways: usize) -> f64 {
        self.win_rate() + self.tie_rate() / split_ways.max(1) as f64
    }

    fn rate(&self, count: f64) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            count / self.trials as f64
        }
    }
}

/// Cooperative stop signal for long simulations.
///
/// Clones share the same flag, so one handle can be given to a simulation
/// and another kept by the caller to [`cancel`](StopToken::cancel) it.
#[derive(Debug, Clone, Default)]
pub struct StopToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also stops once `deadline` has passed.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn after(budget: Duration) -> Self {
        Self::with_deadline(Instant::now() + budget)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Runs up to `trials` trials in order, stopping early if `stop` fires.
pub(crate) fn run_trials<F>(
    trials: u64,
    stop: Option<&StopToken>,
    mut trial: F,
) -> Result<Tally, EngineError>
where
    F: FnMut(&mut Tally) -> Result<(), EngineError>,
{
    if trials == 0 {
        return Err(EngineError::InvalidTrialCount);
    }
    let tally = run_batch(trials, stop, &mut trial)?;
    finish(tally, trials)
}

/// Runs `trials` trials across the rayon pool in batches of [`BATCH_TRIALS`].
///
/// Batch `i` draws from stream `i` of a `ChaCha20Rng` seeded with `seed`, so
/// the merged tally depends only on `seed` and `trials`.
pub(crate) fn run_trials_parallel<F>(
    trials: u64,
    seed: u64,
    stop: Option<&StopToken>,
    trial: F,
) -> Result<Tally, EngineError>
where
    F: Fn(&mut ChaCha20Rng, &mut Tally) -> Result<(), EngineError> + Sync,
{
    if trials == 0 {
        return Err(EngineError::InvalidTrialCount);
    }
    let batches = trials.div_ceil(BATCH_TRIALS);
    let tallies = (0..batches)
        .into_par_iter()
        .map(|batch| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            rng.set_stream(batch);
            let n = BATCH_TRIALS.min(trials - batch * BATCH_TRIALS);
            run_batch(n, stop, &mut |t: &mut Tally| trial(&mut rng, t))
        })
        .collect::<Result<Vec<Tally>, EngineError>>()?;

    let mut total = Tally::default();
    for t in &tallies {
        total.merge(t);
    }
    finish(total, trials)
}

fn run_batch<F>(trials: u64, stop: Option<&StopToken>, trial: &mut F) -> Result<Tally, EngineError>
where
    F: FnMut(&mut Tally) -> Result<(), EngineError>,
{
    let mut tally = Tally::default();
    for i in 0..trials {
        if i % STOP_POLL_INTERVAL == 0 && stop.is_some_and(StopToken::is_stopped) {
            break;
        }
        trial(&mut tally)?;
        tally.trials += 1;
    }
    Ok(tally)
}

fn finish(tally: Tally, requested: u64) -> Result<Tally, EngineError> {
    if tally.trials == 0 {
        return Err(EngineError::Cancelled);
    }
    if tally.trials < requested {
        tracing::warn!(
            completed = tally.trials,
            requested,
            "simulation stopped early"
        );
    }
    Ok(tally)
}
