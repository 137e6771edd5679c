//! Statistics aggregation over JSONL match records.
//!
//! Reads the files written by `lastturn sim --output` (or any file of
//! serialized `MatchRecord`s) and prints totals per outcome and average
//! damage as JSON.

use crate::error::CliError;
use crate::io_utils::{jsonl_files, read_text};
use crate::ui;
use lastturn_engine::logger::MatchRecord;
use lastturn_engine::outcome::Outcome;
use lastturn_session::{HistoryError, HistoryStore, MatchFilter, MatchStatistics};
use std::io::Write;
use std::path::Path;

#[derive(Default)]
struct StatsState {
    records: Vec<MatchRecord>,
    /// Lines that are not a valid record
    corrupted: u64,
    /// Unterminated last lines that fail to parse, as left by an interrupted writer
    incomplete: u64,
}

impl StatsState {
    fn consume(&mut self, content: &str) {
        let has_trailing_nl = content.ends_with('\n');
        let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
        for (i, line) in lines.iter().enumerate() {
            match serde_json::from_str::<MatchRecord>(line) {
                Ok(rec) => self.records.push(rec),
                Err(_) if i == lines.len() - 1 && !has_trailing_nl => self.incomplete += 1,
                Err(_) => self.corrupted += 1,
            }
        }
    }
}

/// Aggregates statistics from a JSONL file or every `.jsonl` file below a
/// directory.
///
/// Corrupted lines are counted and reported on `err` but do not fail the
/// command, unless a single input file holds no valid record at all. With
/// `outcome` set, only matches that ended that way are aggregated.
pub fn handle_stats_command(
    input: &str,
    outcome: Option<Outcome>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(input);
    let mut state = StatsState::default();

    if path.is_dir() {
        for file in jsonl_files(path) {
            match read_text(&file) {
                Ok(content) => state.consume(&content),
                Err(_) => state.corrupted += 1,
            }
        }
    } else {
        match read_text(path) {
            Ok(content) => state.consume(&content),
            Err(e) => {
                ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
                return Err(CliError::InvalidInput(format!(
                    "Failed to read {}: {}",
                    input, e
                )));
            }
        }
    }

    if state.corrupted > 0 {
        ui::write_error(
            err,
            &format!("Skipped {} corrupted record(s)", state.corrupted),
        )?;
    }
    if state.incomplete > 0 {
        ui::write_error(
            err,
            &format!("Discarded {} incomplete final line(s)", state.incomplete),
        )?;
    }
    if !path.is_dir() && state.records.is_empty() && (state.corrupted > 0 || state.incomplete > 0)
    {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let stats = aggregate(state.records, outcome)
        .map_err(|e| CliError::Engine(format!("Failed to aggregate records: {}", e)))?;
    tracing::debug!(matches = stats.total_matches, corrupted = state.corrupted, "stats aggregated");
    let summary = serde_json::json!({
        "matches": stats.total_matches,
        "outcomes": {
            "VICTORY": stats.victories,
            "DEFEAT": stats.defeats,
            "DRAW": stats.draws,
        },
        "win_rate": stats.win_rate,
        "avg_damage_dealt": stats.avg_damage_dealt,
        "avg_damage_received": stats.avg_damage_received,
        "cards_eliminated": stats.total_cards_eliminated,
        "corrupted": state.corrupted + state.incomplete,
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;
    Ok(())
}

fn aggregate(
    records: Vec<MatchRecord>,
    outcome: Option<Outcome>,
) -> Result<MatchStatistics, HistoryError> {
    let store = HistoryStore::new();
    for record in records {
        store.add_match(record)?;
    }
    if outcome.is_none() {
        return store.calculate_stats();
    }
    let selected = store.filter_matches(&MatchFilter { outcome })?;
    Ok(MatchStatistics::from_records(&selected))
}
