//! # lastturn-ai: Automated Opponents
//!
//! Placement policies for the automated side of a match. A policy looks at a
//! read-only [`Match`] and proposes one [`Placement`] or passes.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait every policy implements
//! - [`baseline`] - Uniformly random placement (the default opponent)
//! - [`first_fit`] - First hand card into the first empty slot
//! - [`create_ai`] - Factory selecting a policy by name
//!
//! ## Quick Start
//!
//! ```rust
//! use lastturn_ai::create_ai;
//! use lastturn_engine::engine::Match;
//! use lastturn_engine::game::MatchConfig;
//! use lastturn_engine::player::SideId;
//!
//! let mut ai = create_ai("baseline", Some(42));
//! let game = Match::start(MatchConfig { seed: Some(42), ..Default::default() })
//!     .expect("valid config");
//!
//! if let Some(p) = ai.choose_placement(&game, SideId::Opponent) {
//!     assert!(game.opponent().hand().contains(p.card_id));
//!     assert!(game.opponent().board().slot(p.slot).is_some_and(|s| s.is_empty()));
//! }
//! ```

use lastturn_engine::engine::Match;
use lastturn_engine::game::Placement;
use lastturn_engine::player::SideId;

pub mod baseline;
pub mod first_fit;

/// A placement policy for one side of a match.
///
/// Policies may keep internal state (an RNG, for instance), hence `&mut self`.
/// They only propose; the match validates the placement and treats an invalid
/// proposal as a pass.
///
/// # Example Implementation
///
/// ```rust
/// use lastturn_ai::AIOpponent;
/// use lastturn_engine::engine::Match;
/// use lastturn_engine::game::Placement;
/// use lastturn_engine::player::SideId;
///
/// struct LastSlot;
///
/// impl AIOpponent for LastSlot {
///     fn choose_placement(&mut self, game: &Match, side: SideId) -> Option<Placement> {
///         let side = game.side(side);
///         let card_id = side.hand().first()?.id;
///         let slot = *side.board().empty_slots().last()?;
///         Some(Placement { card_id, slot })
///     }
///
///     fn name(&self) -> &str {
///         "LastSlot"
///     }
/// }
/// ```
pub trait AIOpponent: Send {
    /// Proposes a placement for `side`, or `None` to pass.
    ///
    /// Returning `None` is expected when the side has no card in hand or no
    /// empty slot.
    fn choose_placement(&mut self, game: &Match, side: SideId) -> Option<Placement>;

    /// Return the name/identifier of this AI implementation.
    fn name(&self) -> &str;
}

/// Names accepted by [`create_ai`].
pub const AI_NAMES: [&str; 2] = ["baseline", "first_fit"];

/// Factory function to create AI opponents by type string.
///
/// Unknown names fall back to the baseline policy, so a typo in a config file
/// never prevents a match from starting.
///
/// # Example
///
/// ```rust
/// use lastturn_ai::create_ai;
///
/// assert_eq!(create_ai("first_fit", None).name(), "FirstFitAI");
/// assert_eq!(create_ai("no-such-ai", None).name(), "BaselineAI");
/// ```
pub fn create_ai(ai_type: &str, seed: Option<u64>) -> Box<dyn AIOpponent> {
    match ai_type {
        "first_fit" | "first-fit" => Box::new(first_fit::FirstFitAI::new()),
        _ => Box::new(baseline::BaselineAI::new(seed)),
    }
}
