use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// One positional placeholder on a side's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSlot {
    index: usize,
    card: Option<Card>,
}

impl BoardSlot {
    pub fn new(index: usize) -> Self {
        Self { index, card: None }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.card.is_none()
    }

    /// Puts `card` into an empty slot. Returns the card back if occupied.
    pub(crate) fn place(&mut self, card: Card) -> Result<(), Card> {
        if self.card.is_some() {
            return Err(card);
        }
        self.card = Some(card);
        Ok(())
    }

    /// Stores the damaged copy of the occupant; a defeated copy clears the
    /// slot instead, so a card never persists at zero health.
    pub(crate) fn update(&mut self, card: Card) {
        self.card = if card.is_defeated() { None } else { Some(card) };
    }
}

/// A side's row of slots, fixed in length for the whole match.
#[derive(Debug, Clone)]
pub struct Board {
    slots: Vec<BoardSlot>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(BoardSlot::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&BoardSlot> {
        self.slots.get(index)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut BoardSlot> {
        self.slots.get_mut(index)
    }

    pub fn slots(&self) -> &[BoardSlot] {
        &self.slots
    }

    pub fn empty_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| s.is_empty())
            .map(BoardSlot::index)
            .collect()
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(BoardSlot::is_empty)
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn has_cards(&self) -> bool {
        self.occupied() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupied_slot_rejects_second_card() {
        let mut board = Board::new(3);
        let slot = board.slot_mut(1).expect("slot 1");
        assert!(slot.place(Card::new(1, "Warrior", 3, 6)).is_ok());
        let bounced = slot
            .place(Card::new(2, "Mage", 5, 3))
            .expect_err("slot is occupied");
        assert_eq!(bounced.id, 2);
        assert_eq!(board.empty_slots(), vec![0, 2]);
        assert_eq!(board.first_empty(), Some(0));
    }

    #[test]
    fn defeated_update_clears_the_slot() {
        let mut slot = BoardSlot::new(0);
        let card = Card::new(6, "Berserker", 8, 1);
        slot.place(card.clone()).expect("empty slot");
        slot.update(card.after_hit(1));
        assert!(slot.is_empty());
    }
}
