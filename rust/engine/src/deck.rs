use rand::seq::SliceRandom;
use rand::Rng;

use crate::cards::{full_deck, Card};
use crate::errors::EngineError;

/// An ordered pile of cards dealt from the front.
///
/// A single 52-card deck never holds two identical cards; a multi-deck shoe
/// holds one copy per deck. Dealing advances a cursor, so the dealt cards are
/// gone from the deck's point of view and [`Deck::remaining`] shrinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    /// A full, unshuffled 52-card deck.
    pub fn full() -> Self {
        Self::from_cards(full_deck())
    }

    /// `decks` full decks combined into one unshuffled shoe.
    pub fn shoe(decks: usize) -> Self {
        let mut cards = Vec::with_capacity(52 * decks);
        for _ in 0..decks {
            cards.extend(full_deck());
        }
        Self::from_cards(cards)
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    /// Set difference: every copy of every known card is removed.
    /// Known cards that are not in the deck are ignored.
    pub fn without(self, known: &[Card]) -> Self {
        let mut gone = [false; 52];
        for c in known {
            gone[c.index()] = true;
        }
        let cards = self
            .remaining_cards()
            .iter()
            .copied()
            .filter(|c| !gone[c.index()])
            .collect();
        Self::from_cards(cards)
    }

    /// Removes a single copy of `card`, returning whether one was present.
    pub fn remove_one(&mut self, card: Card) -> bool {
        match self.cards[self.position..].iter().position(|&c| c == card) {
            Some(i) => {
                self.cards.remove(self.position + i);
                true
            }
            None => false,
        }
    }

    /// Uniformly permutes the undealt cards with the supplied RNG.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards[self.position..].shuffle(rng);
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        if self.position >= self.cards.len() {
            None
        } else {
            let c = self.cards[self.position];
            self.position += 1;
            Some(c)
        }
    }

    /// Deals `n` cards from the front, or fails without dealing anything.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        let available = self.remaining();
        if n > available {
            return Err(EngineError::InsufficientDeck {
                needed: n,
                available,
            });
        }
        let drawn = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(drawn)
    }

    /// Deals the undealt cards alternately into two piles, first card to the left.
    pub fn split_alternate(self) -> (Deck, Deck) {
        let (left, right): (Vec<_>, Vec<_>) = self
            .remaining_cards()
            .iter()
            .enumerate()
            .partition(|(i, _)| i % 2 == 0);
        (
            Self::from_cards(left.into_iter().map(|(_, &c)| c).collect()),
            Self::from_cards(right.into_iter().map(|(_, &c)| c).collect()),
        )
    }

    /// The undealt cards of `self` followed by those of `other`.
    pub fn chain(self, other: Deck) -> Deck {
        let mut cards = self.remaining_cards().to_vec();
        cards.extend_from_slice(other.remaining_cards());
        Self::from_cards(cards)
    }

    pub fn remaining_cards(&self) -> &[Card] {
        &self.cards[self.position..]
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
