//! # Play Command
//!
//! Interactive match against the automated opponent, with real clocks.
//!
//! The match runs inside a [`MatchSession`] on a single-threaded tokio
//! runtime. Input lines are read on a separate thread and forwarded over a
//! channel, so the one-second clock ticks keep running while the player
//! thinks. New match log lines are echoed as they appear.
//!
//! ## Commands
//!
//! - `select <id>`: choose a hand card
//! - `place <slot>`: put the selected card into a board slot
//! - `hand`, `board`, `log`: show the current hand, both boards, or the full log
//! - `help`: list commands
//! - `quit` (or end of input): leave the match

use crate::config::Config;
use crate::error::CliError;
use crate::io_utils::read_stdin_line;
use crate::ui;
use lastturn_engine::snapshot::MatchSnapshot;
use lastturn_session::{MatchSession, ResultState, SessionError, SessionOptions};
use std::io::{BufRead, Write};
use tokio::sync::{mpsc, watch};

const HELP: &str = "Commands: select <id>, place <slot>, hand, board, log, help, quit";

/// One parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayInput {
    Select(u32),
    Place(usize),
    Hand,
    Board,
    Log,
    Help,
    Quit,
    Invalid(String),
}

impl PlayInput {
    pub fn parse(line: &str) -> PlayInput {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return PlayInput::Invalid("empty input".into());
        };
        let arg = words.next();
        match (verb.to_ascii_lowercase().as_str(), arg) {
            ("select" | "s", Some(a)) => match a.parse() {
                Ok(id) => PlayInput::Select(id),
                Err(_) => PlayInput::Invalid(format!("invalid card id: {}", a)),
            },
            ("place" | "p", Some(a)) => match a.parse() {
                Ok(slot) => PlayInput::Place(slot),
                Err(_) => PlayInput::Invalid(format!("invalid slot: {}", a)),
            },
            ("select" | "s", None) => PlayInput::Invalid("usage: select <id>".into()),
            ("place" | "p", None) => PlayInput::Invalid("usage: place <slot>".into()),
            ("hand" | "h", _) => PlayInput::Hand,
            ("board" | "b", _) => PlayInput::Board,
            ("log" | "l", _) => PlayInput::Log,
            ("help" | "?", _) => PlayInput::Help,
            ("quit" | "q" | "exit", _) => PlayInput::Quit,
            (other, _) => PlayInput::Invalid(format!("unknown command: {}", other)),
        }
    }
}

/// Plays one interactive match, reading commands from `input`.
///
/// Returns `CliError::Interrupted` when the player quits (or input ends)
/// before the match is decided.
pub fn handle_play_command(
    config: &Config,
    input: Box<dyn BufRead + Send>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(play_match(config, input, out, err))
}

async fn play_match(
    config: &Config,
    input: Box<dyn BufRead + Send>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let session = MatchSession::spawn(SessionOptions {
        ai: config.ai.clone(),
        ..SessionOptions::default()
    });
    let first = match session.start_match(config.match_config()).await {
        Ok(s) => s,
        Err(e) => {
            session.shutdown().await;
            return Err(e.into());
        }
    };

    writeln!(
        out,
        "play: board_size={} total={}s action={}s ai={}",
        config.board_size, config.total_time_secs, config.action_time_secs, config.ai
    )?;
    writeln!(out, "{}", HELP)?;
    let mut printed = echo_log(out, &first, 0)?;
    ui::render_board(out, &first)?;
    ui::render_hand(out, &first)?;

    let mut lines = spawn_reader(input);
    let mut snapshots = session.watch();
    let mut results = session.results();
    let mut latest = first;
    let mut finished = false;

    loop {
        tokio::select! {
            biased;
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                if !results.borrow_and_update().is_pending() {
                    continue;
                }
                refresh(&mut snapshots, &mut latest);
                printed = echo_log(out, &latest, printed)?;
                if let Some(result) = session.reset_result_event().await? {
                    ui::render_result(out, &result)?;
                }
                finished = true;
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                refresh(&mut snapshots, &mut latest);
                printed = echo_log(out, &latest, printed)?;
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    break;
                };
                match PlayInput::parse(&line) {
                    PlayInput::Quit => break,
                    PlayInput::Select(id) => report(err, session.select_card(id).await)?,
                    PlayInput::Place(slot) => report(err, session.place_card(slot).await)?,
                    PlayInput::Hand => ui::render_hand(out, &latest)?,
                    PlayInput::Board => {
                        ui::render_status(out, &latest)?;
                        ui::render_board(out, &latest)?;
                    }
                    PlayInput::Log => {
                        for line in &latest.log {
                            writeln!(out, "{}", line)?;
                        }
                    }
                    PlayInput::Help => writeln!(out, "{}", HELP)?,
                    PlayInput::Invalid(msg) => ui::write_error(err, &msg)?,
                }
                refresh(&mut snapshots, &mut latest);
                printed = echo_log(out, &latest, printed)?;
            }
        }
    }

    session.shutdown().await;
    if finished {
        Ok(())
    } else {
        writeln!(out, "Match abandoned.")?;
        Err(CliError::Interrupted("match abandoned".into()))
    }
}

/// Forwards input lines from a blocking reader thread.
fn spawn_reader(input: Box<dyn BufRead + Send>) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let mut input = input;
        while let Some(line) = read_stdin_line(&mut *input) {
            if line.is_empty() {
                continue;
            }
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn refresh(snapshots: &mut watch::Receiver<Option<MatchSnapshot>>, latest: &mut MatchSnapshot) {
    if let Some(snap) = snapshots.borrow_and_update().as_ref() {
        *latest = snap.clone();
    }
}

/// Prints log lines past `printed` and returns the new count.
fn echo_log(out: &mut dyn Write, snap: &MatchSnapshot, printed: usize) -> std::io::Result<usize> {
    for line in snap.log.iter().skip(printed) {
        writeln!(out, "{}", line)?;
    }
    Ok(snap.log.len().max(printed))
}

/// Rejected intents are shown and play continues; a dead session is fatal.
fn report(err: &mut dyn Write, result: Result<(), SessionError>) -> Result<(), CliError> {
    match result {
        Ok(()) => Ok(()),
        Err(SessionError::Game(e)) => Ok(ui::write_error(err, &e.to_string())?),
        Err(e) => Err(e.into()),
    }
}
