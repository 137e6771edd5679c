use thiserror::Error;

use crate::cards::CardId;
use crate::game::TurnState;

/// Reasons an intent or a setup request is refused.
///
/// Intent errors (`NoCardSelected`, `SlotOccupied`, `NotPlayersTurn`, ...)
/// are recoverable: the match is left untouched apart from a log line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("No card selected for placement")]
    NoCardSelected,
    #[error("Card {0} is not in hand")]
    CardNotInHand(CardId),
    #[error("Slot {0} is already occupied")]
    SlotOccupied(usize),
    #[error("Slot {slot} does not exist (board size {size})")]
    SlotOutOfRange { slot: usize, size: usize },
    #[error("It's not the player's turn (current state: {0})")]
    NotPlayersTurn(TurnState),
    #[error("Match already finished")]
    MatchFinished,
    #[error("Duplicate card id {0} in deck")]
    DuplicateCard(CardId),
    #[error("Invalid match configuration: {0}")]
    InvalidConfig(String),
}
