//! # lastturn-session: Live Match Coordination
//!
//! Runs one [`Match`](lastturn_engine::engine::Match) behind a tokio actor
//! so that user intents, the two match clocks and the automatic opponent
//! phases are applied strictly one at a time.
//!
//! - [`session`] - The actor and its [`MatchSession`] handle
//! - [`clock`] - Cancellable periodic tick tasks
//! - [`events`] - Broadcast of [`MatchEvent`]s to subscribers
//! - [`result`] - The one-shot result event and its delivery state
//! - [`history`] - In-memory store of finished matches
//! - [`logging`] - `tracing` subscriber setup and a capturing test layer
//!
//! ```no_run
//! use lastturn_engine::game::MatchConfig;
//! use lastturn_session::{MatchSession, SessionOptions};
//!
//! # async fn demo() -> Result<(), lastturn_session::SessionError> {
//! let session = MatchSession::spawn(SessionOptions::default());
//! let snapshot = session.start_match(MatchConfig::default()).await?;
//! let card = snapshot.player.hand[0].id;
//! session.select_card(card).await?;
//! session.place_card(0).await?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod events;
pub mod history;
pub mod logging;
pub mod result;
pub mod session;

pub use clock::{ClockHandle, ClockSignal};
pub use events::{EventBus, EventSubscription, MatchEvent};
pub use history::{HistoryError, HistoryStore, MatchFilter, MatchStatistics};
pub use logging::{init_logging, init_logging_with, CapturedEvent, TestLogSubscriber};
pub use result::{MatchResult, ResultState};
pub use session::{MatchSession, SessionError, SessionOptions};
