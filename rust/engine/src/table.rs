//! Turning recognised cards into seats.
//!
//! The vision front end reports each card it sees as a [`Detection`]. These
//! helpers drop repeated labels and decide which cards belong to the player
//! and which to the table, using only where the boxes sit in the image.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{parse_cards, Card};
use crate::errors::EngineError;

/// Vertical slack, in pixels, for a card to still count as part of the
/// player's row in blackjack.
pub const PLAYER_ROW_TOLERANCE: f32 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Card token such as `"AS"` or `"10H"`.
    pub label: String,
    pub confidence: f32,
    /// `[x1, y1, x2, y2]` in image pixels, y growing downwards.
    pub bbox: [f32; 4],
}

impl Detection {
    pub fn center_y(&self) -> f32 {
        (self.bbox[1] + self.bbox[3]) / 2.0
    }

    pub fn left(&self) -> f32 {
        self.bbox[0]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokerSeats {
    pub hole: Vec<Card>,
    pub board: Vec<Card>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackjackSeats {
    pub player: Vec<Card>,
    pub dealer: Vec<Card>,
}

/// Keeps the most confident detection of each label, most confident first.
pub fn unique_detections(mut detections: Vec<Detection>) -> Vec<Detection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut seen = std::collections::HashSet::new();
    detections.retain(|d| seen.insert(d.label.clone()));
    detections
}

/// The two cards lowest in the frame are the hole cards; the rest form the
/// board, read left to right. With fewer than two detections everything is
/// treated as board.
pub fn assign_poker_cards(mut detections: Vec<Detection>) -> Result<PokerSeats, EngineError> {
    if detections.len() < 2 {
        return Ok(PokerSeats {
            hole: Vec::new(),
            board: labels_to_cards(&detections)?,
        });
    }
    detections.sort_by(lowest_first);
    let mut board = detections.split_off(2);
    board.sort_by(|a, b| a.left().total_cmp(&b.left()));
    Ok(PokerSeats {
        hole: labels_to_cards(&detections)?,
        board: labels_to_cards(&board)?,
    })
}

/// Cards within [`PLAYER_ROW_TOLERANCE`] of the lowest card's row are the
/// player's; everything higher up belongs to the dealer.
pub fn assign_blackjack_cards(mut detections: Vec<Detection>) -> Result<BlackjackSeats, EngineError> {
    if detections.len() < 2 {
        return Ok(BlackjackSeats {
            player: labels_to_cards(&detections)?,
            dealer: Vec::new(),
        });
    }
    detections.sort_by(lowest_first);
    let threshold = detections[0].center_y() - PLAYER_ROW_TOLERANCE;
    let (player, dealer): (Vec<_>, Vec<_>) = detections
        .into_iter()
        .partition(|d| d.center_y() > threshold);
    Ok(BlackjackSeats {
        player: labels_to_cards(&player)?,
        dealer: labels_to_cards(&dealer)?,
    })
}

fn lowest_first(a: &Detection, b: &Detection) -> Ordering {
    b.center_y().total_cmp(&a.center_y())
}

fn labels_to_cards(detections: &[Detection]) -> Result<Vec<Card>, EngineError> {
    let labels: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
    parse_cards(&labels)
}
