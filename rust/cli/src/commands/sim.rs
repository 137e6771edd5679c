//! Headless match simulation.
//!
//! Both sides are driven by an AI policy and the clocks advance in virtual
//! time: every decision the human side makes costs one second of both
//! clocks, and a side with nothing to play lets its action clock run out. No
//! real time passes, so thousands of matches finish in well under a second.
//!
//! # Examples
//!
//! ```no_run
//! use lastturn_cli::commands::sim::{SimArgs, handle_sim_command};
//! use lastturn_cli::config::Config;
//! use std::io;
//!
//! let args = SimArgs { matches: 100, output: Some("data/sim.jsonl".into()) };
//! let config = Config { seed: Some(42), ..Config::default() };
//! handle_sim_command(&args, &config, &mut io::stdout(), &mut io::stderr()).unwrap();
//! ```

use crate::config::Config;
use crate::error::CliError;
use crate::ui;
use chrono::Local;
use lastturn_ai::{AIOpponent, create_ai};
use lastturn_engine::clock::TickOutcome;
use lastturn_engine::engine::Match;
use lastturn_engine::game::TurnState;
use lastturn_engine::logger::{MatchLogger, MatchRecord};
use lastturn_engine::outcome::Outcome;
use lastturn_engine::player::SideId;
use std::io::Write;

pub struct SimArgs {
    /// Number of matches to play
    pub matches: u32,
    /// JSONL file receiving one record per match
    pub output: Option<String>,
}

/// Runs `args.matches` matches with the match parameters in `config`.
///
/// Match `i` uses seed `base + i`, where `base` is `config.seed` or a random
/// value, so a seeded run is reproducible match by match.
pub fn handle_sim_command(
    args: &SimArgs,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if args.matches == 0 {
        ui::write_error(err, "matches must be >= 1")?;
        return Err(CliError::InvalidInput("matches must be >= 1".to_string()));
    }

    let mut logger = match &args.output {
        Some(path) => match MatchLogger::create(path) {
            Ok(l) => l,
            Err(e) => {
                ui::write_error(err, &format!("Failed to open output file: {}", e))?;
                return Err(CliError::Io(e));
            }
        },
        None => MatchLogger::in_memory(&Local::now().format("%Y%m%d").to_string()),
    };

    let base_seed = config.seed.unwrap_or_else(rand::random);
    writeln!(
        out,
        "sim: matches={} board_size={} ai={} seed={}",
        args.matches, config.board_size, config.ai, base_seed
    )?;

    let mut tally = [0u32; 3];
    for i in 0..args.matches {
        let seed = base_seed.wrapping_add(u64::from(i));
        let record = simulate_match(config, seed, logger.next_id())?;
        logger.write(&record)?;

        tally[outcome_index(record.outcome)] += 1;
        writeln!(
            out,
            "{}: {} ({}) turns={} dealt={} received={}",
            record.match_id,
            record.outcome,
            record.reason.as_str(),
            record.turns_played,
            record.damage_dealt,
            record.damage_received
        )?;
    }

    writeln!(
        out,
        "Simulated {} matches: VICTORY={} DEFEAT={} DRAW={}",
        args.matches, tally[0], tally[1], tally[2]
    )?;
    if let Some(path) = &args.output {
        writeln!(out, "Saved {} records to {}", args.matches, path)?;
    }
    Ok(())
}

fn outcome_index(outcome: Outcome) -> usize {
    match outcome {
        Outcome::Victory => 0,
        Outcome::Defeat => 1,
        Outcome::Draw => 2,
    }
}

fn simulate_match(config: &Config, seed: u64, match_id: String) -> Result<MatchRecord, CliError> {
    let mut match_config = config.match_config();
    match_config.seed = Some(seed);
    let mut game = Match::start(match_config)?;
    let mut player = create_ai(&config.ai, Some(seed.wrapping_add(2)));
    let mut opponent = create_ai(&config.ai, Some(seed.wrapping_add(1)));

    play_headless(&mut game, player.as_mut(), opponent.as_mut());

    let Some(record) = game.record(match_id) else {
        return Err(CliError::Engine("simulated match did not finish".into()));
    };
    tracing::debug!(
        match_id = %record.match_id,
        outcome = %record.outcome,
        turns = record.turns_played,
        "simulated match finished"
    );
    Ok(record)
}

/// Plays `game` to the end. Every loop iteration ticks the total clock at
/// least once, so the match always terminates.
fn play_headless(game: &mut Match, player: &mut dyn AIOpponent, opponent: &mut dyn AIOpponent) {
    while !game.is_finished() {
        game.run_until_idle(|g| opponent.choose_placement(g, SideId::Opponent));
        if game.is_finished() {
            break;
        }

        // one second to decide
        game.tick_action();
        if matches!(game.tick_total(), TickOutcome::Finished { .. }) {
            break;
        }
        if game.turn() != TurnState::AwaitingPlayer {
            continue;
        }

        let placed = match player.choose_placement(game, SideId::Player) {
            Some(p) => game
                .select_card(p.card_id)
                .and_then(|()| game.place_card(p.slot))
                .is_ok(),
            None => false,
        };
        if placed {
            continue;
        }

        // nothing to play: wait out the action clock
        while !game.is_finished() && game.turn() == TurnState::AwaitingPlayer {
            game.tick_action();
            game.tick_total();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_match_always_finishes() {
        let config = Config {
            board_size: 2,
            ..Config::default()
        };
        for seed in 0..20 {
            let record = simulate_match(&config, seed, format!("m{seed}")).unwrap();
            assert_eq!(record.match_id, format!("m{seed}"));
            assert_eq!(record.seed, Some(seed));
        }
    }

    #[test]
    fn seeded_matches_are_reproducible() {
        let config = Config::default();
        let a = simulate_match(&config, 99, "a".into()).unwrap();
        let b = simulate_match(&config, 99, "a".into()).unwrap();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.reason, b.reason);
        assert_eq!(a.turns_played, b.turns_played);
        assert_eq!(a.damage_dealt, b.damage_dealt);
    }
}
