use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::cards::{Card, CardId};
use crate::deck::Deck;
use crate::hand::Hand;

/// Identifies one of the two competitors.
/// `Player` is the human side; `Opponent` is driven automatically.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideId {
    Player,
    Opponent,
}

impl SideId {
    pub fn other(self) -> SideId {
        match self {
            SideId::Player => SideId::Opponent,
            SideId::Opponent => SideId::Player,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SideId::Player => "player",
            SideId::Opponent => "opponent",
        }
    }
}

/// Starting (and maximum) hit points of each side.
pub const MAX_HEALTH: u32 = 3;

/// Cumulative statistics for one side.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SideMetrics {
    /// Damage dealt by this side's cards, in clashes and in direct attacks
    pub damage_dealt: u32,
    /// Opposing cards this side's cards have eliminated
    pub cards_eliminated: u32,
}

/// One competitor: hit points plus the deck, hand and board it owns.
#[derive(Debug, Clone)]
pub struct Side {
    name: String,
    max_health: u32,
    health: u32,
    pub(crate) deck: Deck,
    pub(crate) hand: Hand,
    pub(crate) board: Board,
    pub(crate) metrics: SideMetrics,
}

impl Side {
    pub fn new(name: impl Into<String>, deck: Deck, board_size: usize) -> Self {
        Self {
            name: name.into(),
            max_health: MAX_HEALTH,
            health: MAX_HEALTH,
            deck,
            hand: Hand::new(),
            board: Board::new(board_size),
            metrics: SideMetrics::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn metrics(&self) -> SideMetrics {
        self.metrics
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Whether any card remains anywhere: deck, hand, or board.
    pub fn has_cards_available(&self) -> bool {
        !self.deck.is_empty() || !self.hand.is_empty() || self.board.has_cards()
    }

    /// Health loss applied to the side itself. Saturates at zero.
    pub(crate) fn take_direct_hit(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Moves the head of the deck into the hand.
    pub(crate) fn draw(&mut self) -> Option<CardId> {
        let card = self.deck.draw()?;
        let id = card.id;
        self.hand.add(card);
        Some(id)
    }

    /// Moves a card from hand to an empty slot. On failure nothing moves.
    pub(crate) fn play(&mut self, card_id: CardId, slot: usize) -> Option<Card> {
        if !self.board.slot(slot)?.is_empty() {
            return None;
        }
        let card = self.hand.remove(card_id)?;
        let placed = card.clone();
        match self.board.slot_mut(slot)?.place(card) {
            Ok(()) => Some(placed),
            Err(card) => {
                self.hand.add(card);
                None
            }
        }
    }
}
