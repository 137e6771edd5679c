use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::Card;
use crate::errors::GameError;

/// Ordered draw pile owned by one side. Drawing pops from the front.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Builds a deck keeping the given order.
    pub fn new(cards: Vec<Card>) -> Result<Self, GameError> {
        let mut seen = HashSet::with_capacity(cards.len());
        for card in &cards {
            if !seen.insert(card.id) {
                return Err(GameError::DuplicateCard(card.id));
            }
        }
        Ok(Self {
            cards: cards.into(),
        })
    }

    /// Builds a deck and shuffles it with a ChaCha20 stream seeded from `seed`.
    pub fn new_with_seed(cards: Vec<Card>, seed: u64) -> Result<Self, GameError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut deck = Self::new(cards)?;
        deck.cards.make_contiguous().shuffle(&mut rng);
        Ok(deck)
    }

    /// Removes the head card. An empty deck yields `None`, which callers treat
    /// as a normal outcome.
    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.pop_front();
        match &card {
            Some(c) => tracing::debug!(card = %c.name, remaining = self.cards.len(), "card drawn"),
            None => tracing::debug!("draw attempted from empty deck"),
        }
        card
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}
