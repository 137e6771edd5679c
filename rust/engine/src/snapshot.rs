use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::game::TurnState;
use crate::outcome::{EndReason, Outcome};
use crate::player::{Side, SideMetrics};

/// Read-only copy of one side, safe to hand to observers.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SideView {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub hand: Vec<Card>,
    /// One entry per slot, `None` when the slot is empty
    pub board: Vec<Option<Card>>,
    pub deck_remaining: usize,
    pub metrics: SideMetrics,
}

impl SideView {
    pub(crate) fn of(side: &Side) -> Self {
        Self {
            name: side.name().to_string(),
            health: side.health(),
            max_health: side.max_health(),
            hand: side.hand().cards().to_vec(),
            board: side
                .board()
                .slots()
                .iter()
                .map(|s| s.card().cloned())
                .collect(),
            deck_remaining: side.deck().remaining(),
            metrics: side.metrics(),
        }
    }
}

/// Everything a presentation layer needs to render the match.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub turn: TurnState,
    pub board_size: usize,
    pub player: SideView,
    pub opponent: SideView,
    pub selected: Option<CardId>,
    pub remaining_total_secs: u32,
    pub remaining_action_secs: u32,
    pub turns_played: u32,
    pub outcome: Option<Outcome>,
    pub end_reason: Option<EndReason>,
    pub log: Vec<String>,
}

impl MatchSnapshot {
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}
