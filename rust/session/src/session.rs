//! The single-writer match session.
//!
//! One spawned actor task owns the live [`Match`]. User intents arrive over a
//! command channel, clock ticks over a signal channel, and the actor applies
//! them one at a time, so a forced forfeit and a placement can never
//! interleave. Observers read immutable [`MatchSnapshot`]s from a `watch`
//! channel and [`MatchEvent`]s from the [`EventBus`].

use crate::clock::{ClockHandle, ClockSignal};
use crate::events::{EventBus, EventSubscription, MatchEvent};
use crate::history::HistoryStore;
use crate::result::{MatchResult, ResultState};
use chrono::{SecondsFormat, Utc};
use lastturn_ai::{create_ai, AIOpponent};
use lastturn_engine::cards::CardId;
use lastturn_engine::clock::{ClockKind, TickOutcome};
use lastturn_engine::engine::{Match, Step};
use lastturn_engine::errors::GameError;
use lastturn_engine::game::{MatchConfig, TurnState};
use lastturn_engine::logger::MatchRecord;
use lastturn_engine::player::SideId;
use lastturn_engine::snapshot::MatchSnapshot;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use uuid::Uuid;

const COMMAND_BUFFER: usize = 64;
const CLOCK_BUFFER: usize = 16;

/// Knobs for a session, fixed for its lifetime.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Clock period; one tick is one second of match time
    pub tick: Duration,
    /// Pause between automatic steps (opponent placement, combat).
    /// Zero runs them back to back within one command.
    pub phase_delay: Duration,
    /// Opponent policy name passed to [`create_ai`]
    pub ai: String,
    /// Receives every finished match exactly once
    pub history: Option<Arc<HistoryStore>>,
    pub events: EventBus,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            phase_delay: Duration::ZERO,
            ai: "baseline".into(),
            history: None,
            events: EventBus::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No match has been started")]
    NoMatch,
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Session has shut down")]
    Closed,
}

enum Command {
    Start {
        config: MatchConfig,
        reply: oneshot::Sender<Result<MatchSnapshot, SessionError>>,
    },
    Select {
        card_id: CardId,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Place {
        slot: usize,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Option<MatchSnapshot>>,
    },
    AcknowledgeResult {
        reply: oneshot::Sender<Option<MatchResult>>,
    },
    Shutdown,
}

/// Cloneable handle to a running session actor.
#[derive(Debug, Clone)]
pub struct MatchSession {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Option<MatchSnapshot>>,
    results: watch::Receiver<ResultState>,
    events: EventBus,
}

impl MatchSession {
    /// Spawns the actor on the current tokio runtime.
    pub fn spawn(options: SessionOptions) -> Self {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (clock_tx, clock_rx) = mpsc::channel(CLOCK_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(None);
        let (result_tx, result_rx) = watch::channel(ResultState::Empty);
        let events = options.events.clone();

        let actor = SessionActor {
            ai: create_ai(&options.ai, None),
            options,
            game: None,
            match_id: String::new(),
            generation: 0,
            clocks: None,
            clock_tx,
            next_phase: None,
            last_turn: None,
            snapshots: snapshot_tx,
            results: result_tx,
        };
        tokio::spawn(actor.run(command_rx, clock_rx));

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            results: result_rx,
            events,
        }
    }

    /// (Re)initializes the match. Clocks of any previous match are cancelled
    /// first; an invalid config leaves the previous match untouched.
    pub async fn start_match(&self, config: MatchConfig) -> Result<MatchSnapshot, SessionError> {
        self.request(|reply| Command::Start { config, reply })
            .await?
    }

    pub async fn select_card(&self, card_id: CardId) -> Result<(), SessionError> {
        self.request(|reply| Command::Select { card_id, reply })
            .await?
    }

    pub async fn place_card(&self, slot: usize) -> Result<(), SessionError> {
        self.request(|reply| Command::Place { slot, reply }).await?
    }

    /// Current state, read through the actor so it reflects every command
    /// sent before it.
    pub async fn snapshot(&self) -> Result<Option<MatchSnapshot>, SessionError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Consumes the pending result event, if any. Returns the result that was
    /// acknowledged; a second call returns `None`.
    pub async fn reset_result_event(&self) -> Result<Option<MatchResult>, SessionError> {
        self.request(|reply| Command::AcknowledgeResult { reply })
            .await
    }

    /// Latest published result state, without waiting on the actor.
    pub fn result(&self) -> ResultState {
        self.results.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<Option<MatchSnapshot>> {
        self.snapshots.clone()
    }

    pub fn results(&self) -> watch::Receiver<ResultState> {
        self.results.clone()
    }

    pub fn subscribe(&self) -> EventSubscription {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Stops the actor and its clocks. Later requests fail with `Closed`.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}

struct SessionActor {
    options: SessionOptions,
    ai: Box<dyn AIOpponent>,
    game: Option<Match>,
    match_id: String,
    /// Bumped on every start; clock signals carry it
    generation: u64,
    clocks: Option<ClockHandle>,
    clock_tx: mpsc::Sender<ClockSignal>,
    /// When the next automatic step is due, if one is scheduled
    next_phase: Option<Instant>,
    last_turn: Option<TurnState>,
    snapshots: watch::Sender<Option<MatchSnapshot>>,
    results: watch::Sender<ResultState>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut clock_rx: mpsc::Receiver<ClockSignal>,
    ) {
        tracing::debug!(ai = %self.options.ai, "session actor started");
        loop {
            let phase_due = self.next_phase;
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(signal) = clock_rx.recv() => self.on_clock(signal),
                _ = phase_timer(phase_due) => {
                    self.next_phase = None;
                    if self.step_once() {
                        self.drive();
                    }
                }
            }
        }
        self.stop_clocks();
        tracing::debug!("session actor stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Start { config, reply } => {
                let _ = reply.send(self.start(config));
            }
            Command::Select { card_id, reply } => {
                let _ = reply.send(self.select(card_id));
            }
            Command::Place { slot, reply } => {
                let _ = reply.send(self.place(slot));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.game.as_ref().map(Match::snapshot));
            }
            Command::AcknowledgeResult { reply } => {
                let mut acknowledged = None;
                self.results.send_if_modified(|state| {
                    acknowledged = state.acknowledge();
                    acknowledged.is_some()
                });
                if let Some(result) = &acknowledged {
                    tracing::debug!(match_id = %result.match_id, "result event acknowledged");
                }
                let _ = reply.send(acknowledged);
            }
            // handled by the run loop
            Command::Shutdown => {}
        }
    }

    fn start(&mut self, config: MatchConfig) -> Result<MatchSnapshot, SessionError> {
        let ai_seed = config.seed.map(|seed| seed.wrapping_add(1));
        let game = Match::start(config)?;

        self.stop_clocks();
        self.generation += 1;
        self.match_id = Uuid::new_v4().to_string();
        self.ai = create_ai(&self.options.ai, ai_seed);
        self.next_phase = None;
        self.last_turn = None;
        self.results.send_replace(ResultState::Empty);

        tracing::info!(
            match_id = %self.match_id,
            generation = self.generation,
            ai = self.ai.name(),
            "session match started"
        );
        self.options.events.broadcast(MatchEvent::MatchStarted {
            match_id: self.match_id.clone(),
            player_name: game.config().player_name.clone(),
            board_size: game.config().board_size,
        });

        let snapshot = game.snapshot();
        let finished = game.is_finished();
        self.game = Some(game);
        if !finished {
            self.clocks = Some(ClockHandle::start(
                self.generation,
                self.options.tick,
                self.clock_tx.clone(),
            ));
        }
        self.after_change();
        Ok(snapshot)
    }

    fn select(&mut self, card_id: CardId) -> Result<(), SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoMatch)?;
        if game.is_finished() {
            return game.select_card(card_id).map_err(SessionError::from);
        }
        let result = game.select_card(card_id);
        match &result {
            Ok(()) => self
                .options
                .events
                .broadcast(MatchEvent::CardSelected { card_id }),
            Err(err) => self.reject(err),
        }
        self.after_change();
        result.map_err(SessionError::from)
    }

    fn place(&mut self, slot: usize) -> Result<(), SessionError> {
        let game = self.game.as_mut().ok_or(SessionError::NoMatch)?;
        if game.is_finished() {
            return game.place_card(slot).map_err(SessionError::from);
        }
        let card_id = game.selected();
        let result = game.place_card(slot);
        match (&result, card_id) {
            (Ok(()), Some(card_id)) => self.options.events.broadcast(MatchEvent::CardPlaced {
                side: SideId::Player,
                card_id,
                slot,
            }),
            (Ok(()), None) => {}
            (Err(err), _) => self.reject(err),
        }
        self.after_change();
        if result.is_ok() {
            self.drive();
        }
        result.map_err(SessionError::from)
    }

    fn reject(&self, err: &GameError) {
        self.options.events.broadcast(MatchEvent::IntentRejected {
            reason: err.to_string(),
        });
    }

    fn on_clock(&mut self, signal: ClockSignal) {
        if signal.generation != self.generation {
            tracing::debug!(
                stale = signal.generation,
                current = self.generation,
                "ignoring tick from a replaced match"
            );
            return;
        }
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let tick = match signal.kind {
            ClockKind::Total => game.tick_total(),
            ClockKind::Action => game.tick_action(),
        };
        tracing::trace!(kind = ?signal.kind, ?tick, "clock tick");

        match tick {
            TickOutcome::Ignored => return,
            TickOutcome::Forfeited => {
                self.options.events.broadcast(MatchEvent::ClockForfeit);
                self.after_change();
                self.drive();
                return;
            }
            TickOutcome::Running { .. } | TickOutcome::Expired | TickOutcome::Finished { .. } => {}
        }
        self.after_change();
    }

    /// Runs pending automatic steps now, or schedules the next one when a
    /// phase delay is configured.
    fn drive(&mut self) {
        if self.options.phase_delay.is_zero() {
            while self.step_once() {}
            return;
        }
        let pending = self
            .game
            .as_ref()
            .is_some_and(|g| !g.is_finished() && g.turn() != TurnState::AwaitingPlayer);
        if pending && self.next_phase.is_none() {
            self.next_phase = Some(Instant::now() + self.options.phase_delay);
        }
    }

    /// Applies one automatic transition. Returns `false` when nothing was due.
    fn step_once(&mut self) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        let ai = &mut self.ai;
        let step = game.advance(|m| ai.choose_placement(m, SideId::Opponent));

        match step {
            Step::Idle => return false,
            Step::OpponentPlaced(Some(placement)) => {
                self.options.events.broadcast(MatchEvent::CardPlaced {
                    side: SideId::Opponent,
                    card_id: placement.card_id,
                    slot: placement.slot,
                });
            }
            Step::OpponentPlaced(None) | Step::Finished(_) => {}
            Step::CombatResolved(lanes) => {
                let (player_health, opponent_health) = self
                    .game
                    .as_ref()
                    .map(|g| (g.player().health(), g.opponent().health()))
                    .unwrap_or_default();
                self.options.events.broadcast(MatchEvent::CombatResolved {
                    lanes,
                    player_health,
                    opponent_health,
                });
            }
        }
        self.after_change();
        true
    }

    /// Publishes the new snapshot and, on the terminal transition, the result.
    fn after_change(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let snapshot = game.snapshot();
        let finished = snapshot.is_finished();
        if self.last_turn != Some(snapshot.turn) {
            self.last_turn = Some(snapshot.turn);
            self.options
                .events
                .broadcast(MatchEvent::TurnChanged { turn: snapshot.turn });
        }
        self.snapshots.send_replace(Some(snapshot));
        if finished {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.stop_clocks();
        self.next_phase = None;

        let Some(record) = self
            .game
            .as_ref()
            .and_then(|g| g.record(self.match_id.clone()))
        else {
            return;
        };
        let record = MatchRecord {
            played_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            ..record
        };
        let result = MatchResult::from(&record);
        let published = self
            .results
            .send_if_modified(|state| state.publish(result.clone()));
        if !published {
            return;
        }

        tracing::info!(
            match_id = %record.match_id,
            outcome = %record.outcome,
            damage_dealt = record.damage_dealt,
            damage_received = record.damage_received,
            "match result published"
        );
        self.options
            .events
            .broadcast(MatchEvent::MatchEnded { result });
        if let Some(history) = &self.options.history {
            if let Err(err) = history.add_match(record) {
                tracing::error!(error = %err, "failed to store match record");
            }
        }
    }

    fn stop_clocks(&mut self) {
        if let Some(clocks) = self.clocks.take() {
            clocks.cancel();
        }
    }
}

async fn phase_timer(due: Option<Instant>) {
    match due {
        Some(due) => tokio::time::sleep_until(due).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commands_without_a_match_fail() {
        let session = MatchSession::spawn(SessionOptions::default());
        assert!(matches!(
            session.select_card(1).await,
            Err(SessionError::NoMatch)
        ));
        assert!(matches!(
            session.place_card(0).await,
            Err(SessionError::NoMatch)
        ));
        assert_eq!(session.snapshot().await.expect("alive"), None);
        assert_eq!(session.reset_result_event().await.expect("alive"), None);
    }

    #[tokio::test]
    async fn shutdown_closes_the_session() {
        let session = MatchSession::spawn(SessionOptions::default());
        session.shutdown().await;
        assert!(matches!(
            session.start_match(MatchConfig::default()).await,
            Err(SessionError::Closed)
        ));
    }
}
