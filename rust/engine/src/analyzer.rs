use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::blackjack::{simulate_outcomes, BlackjackSpot};
use crate::cards::Card;
use crate::errors::EngineError;
use crate::poker::{simulate_equity, PokerSpot, Street};
use crate::settings::Settings;
use crate::strategy::{recommend, Action};
use crate::table::{assign_blackjack_cards, assign_poker_cards, unique_detections, Detection};

/// Everything the advisory front end needs about a poker decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokerAnalysis {
    pub street: Street,
    pub hole: Vec<Card>,
    pub board: Vec<Card>,
    pub opponents: usize,
    pub equity: f64,
}

/// Everything the advisory front end needs about a blackjack decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackjackAnalysis {
    pub player: Vec<Card>,
    pub upcard: Card,
    pub action: Action,
    pub total: u8,
    /// Chance of winning after taking `action`.
    pub win_probability: f64,
}

/// Runs both games' analyses with trial counts and table rules taken from
/// [`Settings`].
///
/// # Examples
///
/// ```
/// use cardsense_engine::analyzer::Analyzer;
/// use cardsense_engine::cards::parse_cards;
/// use cardsense_engine::settings::Settings;
/// use cardsense_engine::strategy::Action;
///
/// let mut settings = Settings::default();
/// settings.seed = Some(9);
/// settings.blackjack.trials = 2_000;
/// let analyzer = Analyzer::new(settings);
///
/// let mut rng = analyzer.settings().rng();
/// let hand = parse_cards(&["TS", "6D"]).unwrap();
/// let a = analyzer.analyze_blackjack(&hand, "TH".parse().unwrap(), &mut rng).unwrap();
/// assert_eq!(a.action, Action::Hit);
/// assert_eq!(a.total, 16);
/// ```
#[derive(Debug, Clone)]
pub struct Analyzer {
    settings: Settings,
}

impl Analyzer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn analyze_poker<R: Rng + ?Sized>(
        &self,
        hole: &[Card],
        board: &[Card],
        rng: &mut R,
    ) -> Result<PokerAnalysis, EngineError> {
        let spot = PokerSpot::new(hole, board, self.settings.poker.opponents)?;
        let tally = simulate_equity(&spot, self.settings.poker.trials, rng, None)?;
        Ok(PokerAnalysis {
            street: spot.street(),
            hole: hole.to_vec(),
            board: board.to_vec(),
            opponents: spot.opponents(),
            equity: spot.equity_of(&tally),
        })
    }

    /// Recommends a move and simulates the win chance of playing it.
    pub fn analyze_blackjack<R: Rng + ?Sized>(
        &self,
        player: &[Card],
        upcard: Card,
        rng: &mut R,
    ) -> Result<BlackjackAnalysis, EngineError> {
        let (action, total) = recommend(player, upcard)?;
        let spot = BlackjackSpot::new(player, upcard, action, self.settings.house_rules())?;
        let tally = simulate_outcomes(&spot, self.settings.blackjack.trials, rng, None)?;
        Ok(BlackjackAnalysis {
            player: player.to_vec(),
            upcard,
            action,
            total,
            win_probability: tally.win_rate(),
        })
    }

    /// `Ok(None)` when the frame shows fewer than two distinct cards.
    pub fn poker_from_detections<R: Rng + ?Sized>(
        &self,
        detections: Vec<Detection>,
        rng: &mut R,
    ) -> Result<Option<PokerAnalysis>, EngineError> {
        let seats = assign_poker_cards(unique_detections(detections))?;
        if seats.hole.is_empty() {
            return Ok(None);
        }
        self.analyze_poker(&seats.hole, &seats.board, rng).map(Some)
    }

    /// `Ok(None)` unless both the player and the dealer have a card in view.
    /// The dealer's lowest-placed card is taken as the upcard.
    pub fn blackjack_from_detections<R: Rng + ?Sized>(
        &self,
        detections: Vec<Detection>,
        rng: &mut R,
    ) -> Result<Option<BlackjackAnalysis>, EngineError> {
        let seats = assign_blackjack_cards(unique_detections(detections))?;
        let Some(&upcard) = seats.dealer.first() else {
            return Ok(None);
        };
        if seats.player.is_empty() {
            return Ok(None);
        }
        self.analyze_blackjack(&seats.player, upcard, rng).map(Some)
    }
}
