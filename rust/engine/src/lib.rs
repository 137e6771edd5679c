//! # lastturn-engine: Lane Card Battle Rules
//!
//! A deterministic, single-threaded model of a two-sided lane card battle:
//! each side owns a deck, a hand and a row of board slots, placements trigger
//! simultaneous lane combat, and the match ends on health, card exhaustion or
//! time.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card values and the standard catalogue
//! - [`deck`] - Draw piles with seeded ChaCha20 shuffling
//! - [`hand`] / [`board`] - Where cards live before and after placement
//! - [`player`] - One side's health, zones and metrics
//! - [`combat`] - Lane resolution, the only place damage is applied
//! - [`outcome`] - Terminal-condition evaluation
//! - [`clock`] - Total and per-action countdowns
//! - [`engine`] - The [`engine::Match`] turn controller
//! - [`logger`] - Match log, records and JSONL output
//! - [`snapshot`] - Serializable views for observers
//!
//! ## Quick Start
//!
//! ```rust
//! use lastturn_engine::engine::Match;
//! use lastturn_engine::game::MatchConfig;
//!
//! let mut game = Match::start(MatchConfig { seed: Some(42), ..Default::default() })
//!     .expect("default config is valid");
//!
//! // Letting the action clock run out forfeits the player's placement
//! for _ in 0..game.config().action_time_secs {
//!     game.tick_action();
//! }
//! game.run_until_idle(|_| None);
//! println!("{}", game.summary());
//! ```
//!
//! ## Deterministic Setup
//!
//! The same seed always yields the same opponent deck order:
//!
//! ```rust
//! use lastturn_engine::cards::standard_catalogue;
//! use lastturn_engine::deck::Deck;
//!
//! let a = Deck::new_with_seed(standard_catalogue(), 42).expect("unique ids");
//! let b = Deck::new_with_seed(standard_catalogue(), 42).expect("unique ids");
//! assert!(a.iter().zip(b.iter()).all(|(x, y)| x.id == y.id));
//! ```

pub mod board;
pub mod cards;
pub mod clock;
pub mod combat;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod outcome;
pub mod player;
pub mod snapshot;
