//! Baseline AI: picks a random hand card and a random empty slot.
//!
//! This is the default opponent. With a seed it is fully reproducible, which
//! lets simulations be replayed move for move.

use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha20Rng;

use crate::AIOpponent;
use lastturn_engine::engine::Match;
use lastturn_engine::game::Placement;
use lastturn_engine::player::SideId;

/// Uniformly random placement policy.
///
/// # Example
///
/// ```rust
/// use lastturn_ai::baseline::BaselineAI;
/// use lastturn_ai::AIOpponent;
///
/// let ai = BaselineAI::new(Some(7));
/// assert_eq!(ai.name(), "BaselineAI");
/// ```
#[derive(Debug, Clone)]
pub struct BaselineAI {
    rng: ChaCha20Rng,
}

impl BaselineAI {
    /// Create a new BaselineAI. Without a seed the RNG is seeded from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_os_rng(),
        };
        Self { rng }
    }
}

impl Default for BaselineAI {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AIOpponent for BaselineAI {
    fn choose_placement(&mut self, game: &Match, side: SideId) -> Option<Placement> {
        let side = game.side(side);
        let slots = side.board().empty_slots();
        let card = side.hand().cards().choose(&mut self.rng)?;
        let slot = *slots.choose(&mut self.rng)?;
        Some(Placement {
            card_id: card.id,
            slot,
        })
    }

    fn name(&self) -> &str {
        "BaselineAI"
    }
}
