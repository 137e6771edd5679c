use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::errors::GameError;

/// States of the turn controller. A finished match keeps its last state;
/// termination is tracked separately by the outcome.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnState {
    /// The human side may place a card
    AwaitingPlayer,
    /// The opponent places automatically; no external input needed
    AwaitingOpponent,
    /// Combat resolution, outcome check and draws are pending
    ResolvingCombat,
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TurnState::AwaitingPlayer => "AWAITING_PLAYER",
            TurnState::AwaitingOpponent => "AWAITING_OPPONENT",
            TurnState::ResolvingCombat => "RESOLVING_COMBAT",
        };
        f.write_str(s)
    }
}

/// A card from hand going into a board slot.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub card_id: CardId,
    pub slot: usize,
}

pub const MAX_BOARD_SIZE: usize = 8;
pub const MAX_CLOCK_SECS: u32 = 999;

/// Parameters chosen when a match starts.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Display name of the human side
    pub player_name: String,
    /// Number of slots per side
    pub board_size: usize,
    /// Whole-match countdown in clock ticks (seconds)
    pub total_time_secs: u32,
    /// Per-action countdown in clock ticks (seconds)
    pub action_time_secs: u32,
    /// Deck shuffle seed; a random one is drawn when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_name: "Player".into(),
            board_size: 4,
            total_time_secs: 180,
            action_time_secs: 30,
            seed: None,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if self.player_name.trim().is_empty() {
            return Err(GameError::InvalidConfig(
                "player_name cannot be empty".into(),
            ));
        }
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "board_size must be between 1 and {MAX_BOARD_SIZE}"
            )));
        }
        for (field, value) in [
            ("total_time_secs", self.total_time_secs),
            ("action_time_secs", self.action_time_secs),
        ] {
            if value == 0 || value > MAX_CLOCK_SECS {
                return Err(GameError::InvalidConfig(format!(
                    "{field} must be between 1 and {MAX_CLOCK_SECS}"
                )));
            }
        }
        Ok(())
    }
}
