//! Deterministic policy: first hand card, first empty slot.

use crate::AIOpponent;
use lastturn_engine::engine::Match;
use lastturn_engine::game::Placement;
use lastturn_engine::player::SideId;

#[derive(Debug, Clone, Default)]
pub struct FirstFitAI;

impl FirstFitAI {
    pub fn new() -> Self {
        Self
    }
}

impl AIOpponent for FirstFitAI {
    fn choose_placement(&mut self, game: &Match, side: SideId) -> Option<Placement> {
        let side = game.side(side);
        let card_id = side.hand().first()?.id;
        let slot = side.board().first_empty()?;
        Some(Placement { card_id, slot })
    }

    fn name(&self) -> &str {
        "FirstFitAI"
    }
}
