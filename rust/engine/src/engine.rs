use crate::cards::{standard_catalogue, Card, CardId};
use crate::clock::{MatchClock, TickOutcome};
use crate::combat::{self, LaneResult};
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::{MatchConfig, Placement, TurnState};
use crate::logger::{format_summary, MatchLog, MatchRecord};
use crate::outcome::{self, Outcome, Verdict};
use crate::player::{Side, SideId};
use crate::snapshot::{MatchSnapshot, SideView};

/// Cards each side draws before the first turn.
pub const OPENING_HAND: usize = 3;
/// Cards each side draws after every combat.
pub const CARDS_DRAWN_PER_TURN: usize = 2;

/// Decks and opening rules for a match.
#[derive(Debug, Clone)]
pub struct MatchSetup {
    /// Player deck, drawn in the given order
    pub player_deck: Vec<Card>,
    pub opponent_deck: Vec<Card>,
    /// Shuffle the opponent deck with the match seed
    pub shuffle_opponent: bool,
    pub opening_hand: usize,
    /// The opponent puts its first hand card on the board before turn one
    pub opponent_opens: bool,
}

impl MatchSetup {
    /// Both sides get the standard catalogue; only the opponent's is shuffled.
    pub fn standard() -> Self {
        Self {
            shuffle_opponent: true,
            ..Self::with_decks(standard_catalogue(), standard_catalogue())
        }
    }

    /// Fixed-order decks, handy for scripted matches.
    pub fn with_decks(player_deck: Vec<Card>, opponent_deck: Vec<Card>) -> Self {
        Self {
            player_deck,
            opponent_deck,
            shuffle_opponent: false,
            opening_hand: OPENING_HAND,
            opponent_opens: true,
        }
    }
}

/// Result of one automatic transition driven by [`Match::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Waiting for the player, or the match is over
    Idle,
    /// The opponent's turn ran; `None` when it could not place a card
    OpponentPlaced(Option<Placement>),
    /// Combat resolved and play returned to the player
    CombatResolved(Vec<LaneResult>),
    /// The match ended during this step
    Finished(Outcome),
}

/// A single match between the human player and the automated opponent.
///
/// The type is a plain state machine. It never sleeps and never spawns; the
/// caller feeds it intents, clock ticks and `advance` calls, which keeps it
/// deterministic under test.
///
/// # Examples
///
/// ```
/// use lastturn_engine::engine::Match;
/// use lastturn_engine::game::{MatchConfig, TurnState};
///
/// let config = MatchConfig { seed: Some(7), ..Default::default() };
/// let mut game = Match::start(config).expect("valid config");
/// assert_eq!(game.turn(), TurnState::AwaitingPlayer);
///
/// let card = game.player().hand().cards()[0].id;
/// game.select_card(card).expect("card in hand");
/// game.place_card(0).expect("slot 0 is empty");
/// assert_eq!(game.turn(), TurnState::ResolvingCombat);
///
/// game.run_until_idle(|_| None);
/// assert!(game.is_finished() || game.turn() == TurnState::AwaitingPlayer);
/// ```
#[derive(Debug, Clone)]
pub struct Match {
    config: MatchConfig,
    seed: u64,
    player: Side,
    opponent: Side,
    turn: TurnState,
    /// Whose placement led to the pending combat
    combat_trigger: SideId,
    selected: Option<CardId>,
    clock: MatchClock,
    verdict: Option<Verdict>,
    log: MatchLog,
    turns_played: u32,
}

impl Match {
    /// Starts a match with the standard catalogue.
    pub fn start(config: MatchConfig) -> Result<Self, GameError> {
        Self::with_setup(config, MatchSetup::standard())
    }

    pub fn with_setup(config: MatchConfig, setup: MatchSetup) -> Result<Self, GameError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);

        let player_deck = Deck::new(setup.player_deck)?;
        let opponent_deck = if setup.shuffle_opponent {
            Deck::new_with_seed(setup.opponent_deck, seed)?
        } else {
            Deck::new(setup.opponent_deck)?
        };

        let mut game = Self {
            player: Side::new(config.player_name.clone(), player_deck, config.board_size),
            opponent: Side::new("Opponent", opponent_deck, config.board_size),
            turn: TurnState::AwaitingPlayer,
            combat_trigger: SideId::Player,
            selected: None,
            clock: MatchClock::new(config.total_time_secs, config.action_time_secs),
            verdict: None,
            log: MatchLog::new(),
            turns_played: 0,
            seed,
            config,
        };

        game.log.push(format!(
            "New match started with {} slots. Total time: {} s, action time: {} s.",
            game.config.board_size, game.config.total_time_secs, game.config.action_time_secs
        ));
        for _ in 0..setup.opening_hand {
            game.player.draw();
            game.opponent.draw();
        }
        if setup.opponent_opens {
            game.place_opening_card();
        }
        game.evaluate();

        tracing::info!(
            player = %game.config.player_name,
            board_size = game.config.board_size,
            seed = game.seed,
            "match started"
        );
        Ok(game)
    }

    fn place_opening_card(&mut self) {
        let card = self.opponent.hand().first().map(|c| c.id);
        let slot = self.opponent.board().first_empty();
        if let (Some(card_id), Some(slot)) = (card, slot) {
            if let Some(card) = self.opponent.play(card_id, slot) {
                self.log
                    .push(format!("Opponent opens with {} in slot {}.", card.name, slot));
            }
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self) -> &Side {
        &self.player
    }

    pub fn opponent(&self) -> &Side {
        &self.opponent
    }

    pub fn side(&self, id: SideId) -> &Side {
        match id {
            SideId::Player => &self.player,
            SideId::Opponent => &self.opponent,
        }
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn selected(&self) -> Option<CardId> {
        self.selected
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.verdict.map(|v| v.outcome)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn is_finished(&self) -> bool {
        self.verdict.is_some()
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    pub fn log(&self) -> &MatchLog {
        &self.log
    }

    /// Marks a hand card as the one to place next. Allowed in any state of
    /// a running match; replaces an earlier selection.
    pub fn select_card(&mut self, card_id: CardId) -> Result<(), GameError> {
        if self.is_finished() {
            return Self::ignore_finished();
        }
        let Some(name) = self.player.hand().get(card_id).map(|c| c.name.clone()) else {
            return self.reject(GameError::CardNotInHand(card_id));
        };
        self.selected = Some(card_id);
        self.log.push(format!("Card selected: {name}"));
        Ok(())
    }

    /// Places the selected card. Only valid while awaiting the player.
    pub fn place_card(&mut self, slot: usize) -> Result<(), GameError> {
        if self.is_finished() {
            return Self::ignore_finished();
        }
        if self.turn != TurnState::AwaitingPlayer {
            return self.reject(GameError::NotPlayersTurn(self.turn));
        }
        let Some(card_id) = self.selected else {
            return self.reject(GameError::NoCardSelected);
        };
        let size = self.config.board_size;
        if slot >= size {
            return self.reject(GameError::SlotOutOfRange { slot, size });
        }
        if self.player.board().slot(slot).is_some_and(|s| !s.is_empty()) {
            return self.reject(GameError::SlotOccupied(slot));
        }
        let Some(card) = self.player.play(card_id, slot) else {
            return self.reject(GameError::CardNotInHand(card_id));
        };

        self.selected = None;
        self.clock.action.reset();
        self.log
            .push(format!("Card {} placed in slot {}.", card.name, slot));
        self.combat_trigger = SideId::Player;
        self.set_turn(TurnState::ResolvingCombat);
        Ok(())
    }

    // a decided match is immutable, so nothing reaches the log
    fn ignore_finished() -> Result<(), GameError> {
        tracing::warn!(error = %GameError::MatchFinished, "intent ignored after the result");
        Err(GameError::MatchFinished)
    }

    fn reject(&mut self, err: GameError) -> Result<(), GameError> {
        tracing::warn!(error = %err, turn = %self.turn, "intent rejected");
        self.log.push(format!("Rejected: {err}"));
        Err(err)
    }

    /// One tick of the whole-match clock. Reaching zero decides the match on
    /// health, then damage dealt.
    pub fn tick_total(&mut self) -> TickOutcome {
        if self.is_finished() {
            return TickOutcome::Ignored;
        }
        if !self.clock.total.tick() {
            return TickOutcome::Running {
                remaining: self.clock.total.remaining(),
            };
        }
        self.log.push("Total match time exhausted.");
        let verdict = outcome::evaluate_by_time(&self.player, &self.opponent);
        self.settle(verdict);
        TickOutcome::Finished {
            outcome: verdict.outcome,
        }
    }

    /// One tick of the per-action clock. Expiry on the player's turn forfeits
    /// the placement; expiry anywhere else has no effect.
    pub fn tick_action(&mut self) -> TickOutcome {
        if self.is_finished() {
            return TickOutcome::Ignored;
        }
        if !self.clock.action.tick() {
            return TickOutcome::Running {
                remaining: self.clock.action.remaining(),
            };
        }
        if self.turn != TurnState::AwaitingPlayer {
            return TickOutcome::Expired;
        }
        self.log
            .push("Action time expired: the player forfeits this placement.");
        self.clock.action.reset();
        self.set_turn(TurnState::AwaitingOpponent);
        TickOutcome::Forfeited
    }

    /// Runs one automatic transition. `choose` is asked for the opponent's
    /// placement whenever the opponent is due to play.
    pub fn advance<F>(&mut self, mut choose: F) -> Step
    where
        F: FnMut(&Match) -> Option<Placement>,
    {
        if self.is_finished() {
            return Step::Idle;
        }
        match self.turn {
            TurnState::AwaitingPlayer => Step::Idle,
            TurnState::AwaitingOpponent => {
                let placed = self.opponent_turn(&mut choose);
                self.combat_trigger = SideId::Opponent;
                self.set_turn(TurnState::ResolvingCombat);
                Step::OpponentPlaced(placed)
            }
            TurnState::ResolvingCombat => self.resolve_combat(&mut choose),
        }
    }

    /// Advances until the player must act or the match is over.
    pub fn run_until_idle<F>(&mut self, mut choose: F) -> Vec<Step>
    where
        F: FnMut(&Match) -> Option<Placement>,
    {
        let mut steps = Vec::new();
        loop {
            match self.advance(&mut choose) {
                Step::Idle => break,
                step => steps.push(step),
            }
        }
        steps
    }

    fn opponent_turn<F>(&mut self, choose: &mut F) -> Option<Placement>
    where
        F: FnMut(&Match) -> Option<Placement>,
    {
        if self.opponent.hand().is_empty() || self.opponent.board().first_empty().is_none() {
            self.log
                .push("Opponent has no card to place or no empty slot.");
            return None;
        }
        let Some(choice) = choose(self) else {
            self.log.push("Opponent passes.");
            return None;
        };
        match self.opponent.play(choice.card_id, choice.slot) {
            Some(card) => {
                self.log.push(format!(
                    "Opponent placed {} in slot {}.",
                    card.name, choice.slot
                ));
                Some(choice)
            }
            None => {
                tracing::warn!(card = choice.card_id, slot = choice.slot, "opponent chose an invalid placement");
                self.log.push("Opponent chose an invalid placement and passes.");
                None
            }
        }
    }

    fn resolve_combat<F>(&mut self, choose: &mut F) -> Step
    where
        F: FnMut(&Match) -> Option<Placement>,
    {
        self.log.push("Combat phase started.");
        let mut lanes = Vec::with_capacity(self.config.board_size);
        for lane in 0..self.config.board_size {
            let result = combat::resolve_lane(&mut self.player, &mut self.opponent, lane);
            if let Some(line) = result.describe() {
                self.log.push(line);
            }
            let direct = result.is_direct_hit();
            lanes.push(result);
            if direct {
                if let Some(outcome) = self.evaluate() {
                    return Step::Finished(outcome);
                }
            }
        }
        if let Some(outcome) = self.evaluate() {
            return Step::Finished(outcome);
        }

        for _ in 0..CARDS_DRAWN_PER_TURN {
            self.player.draw();
            self.opponent.draw();
        }
        self.log.push(format!(
            "Both sides draw. Hands: {} vs {}.",
            self.player.hand().len(),
            self.opponent.hand().len()
        ));

        if self.combat_trigger == SideId::Player {
            self.opponent_turn(choose);
        }

        self.turns_played += 1;
        self.clock.action.reset();
        self.set_turn(TurnState::AwaitingPlayer);
        Step::CombatResolved(lanes)
    }

    /// Checks the terminal conditions and records the verdict if one applies.
    pub fn evaluate(&mut self) -> Option<Outcome> {
        if let Some(verdict) = self.verdict {
            return Some(verdict.outcome);
        }
        let verdict = outcome::evaluate(&self.player, &self.opponent)?;
        self.settle(verdict);
        Some(verdict.outcome)
    }

    /// Records the verdict. Only the first call has an effect.
    fn settle(&mut self, verdict: Verdict) -> bool {
        if self.verdict.is_some() {
            return false;
        }
        self.verdict = Some(verdict);
        self.log.push(verdict.reason.describe());
        self.log.push(format!("Match over: {}.", verdict.outcome));
        tracing::info!(
            outcome = %verdict.outcome,
            reason = ?verdict.reason,
            turns = self.turns_played,
            "match finished"
        );
        true
    }

    fn set_turn(&mut self, next: TurnState) {
        if self.turn != next {
            tracing::debug!(from = %self.turn, to = %next, "turn state changed");
            self.turn = next;
        }
    }

    pub fn summary(&self) -> String {
        let player = self.player.metrics();
        format_summary(
            player.cards_eliminated,
            player.damage_dealt,
            self.opponent.metrics().damage_dealt,
        )
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            turn: self.turn,
            board_size: self.config.board_size,
            player: SideView::of(&self.player),
            opponent: SideView::of(&self.opponent),
            selected: self.selected,
            remaining_total_secs: self.clock.total.remaining(),
            remaining_action_secs: self.clock.action.remaining(),
            turns_played: self.turns_played,
            outcome: self.outcome(),
            end_reason: self.verdict.map(|v| v.reason),
            log: self.log.lines(),
        }
    }

    /// History record for a finished match; `None` while still running.
    pub fn record(&self, match_id: impl Into<String>) -> Option<MatchRecord> {
        let verdict = self.verdict?;
        let player = self.player.metrics();
        Some(MatchRecord {
            match_id: match_id.into(),
            player_name: self.config.player_name.clone(),
            played_at: None,
            outcome: verdict.outcome,
            reason: verdict.reason,
            board_size: self.config.board_size,
            turns_played: self.turns_played,
            damage_dealt: player.damage_dealt,
            damage_received: self.opponent.metrics().damage_dealt,
            cards_eliminated: player.cards_eliminated,
            seed: Some(self.seed),
            log: self.log.lines(),
        })
    }
}
