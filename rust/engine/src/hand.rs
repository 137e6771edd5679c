use crate::cards::{Card, CardId};

/// Cards a side has drawn but not yet placed. Order carries no meaning for
/// the rules; it is kept stable (draw order) so displays do not jump around.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Takes the card with `id` out of the hand.
    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let pos = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(pos))
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
