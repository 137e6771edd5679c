use chrono::{Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::outcome::{EndReason, Outcome};

/// One timestamped line of the match log.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time of day, `HH:MM:SS`
    pub time: String,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.time, self.message)
    }
}

/// Append-only, human readable history of one match.
#[derive(Debug, Clone, Default)]
pub struct MatchLog {
    entries: Vec<LogEntry>,
}

impl MatchLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(target: "lastturn_engine::match_log", "{message}");
        self.entries.push(LogEntry {
            time: Local::now().format("%H:%M:%S").to_string(),
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered `HH:MM:SS - message` lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}

/// Summary of a finished match, written one per line to JSONL history files.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub player_name: String,
    /// RFC3339 time the record was produced
    #[serde(default)]
    pub played_at: Option<String>,
    pub outcome: Outcome,
    pub reason: EndReason,
    pub board_size: usize,
    pub turns_played: u32,
    pub damage_dealt: u32,
    pub damage_received: u32,
    pub cards_eliminated: u32,
    /// Opponent deck shuffle seed (enables replay)
    pub seed: Option<u64>,
    #[serde(default)]
    pub log: Vec<String>,
}

impl MatchRecord {
    /// The three-line statistics block shown when a match ends.
    pub fn summary(&self) -> String {
        format_summary(
            self.cards_eliminated,
            self.damage_dealt,
            self.damage_received,
        )
    }
}

pub fn format_summary(cards_eliminated: u32, damage_dealt: u32, damage_received: u32) -> String {
    format!(
        "Cards eliminated: {cards_eliminated}\nDamage dealt: {damage_dealt}\nDamage received: {damage_received}"
    )
}

pub fn format_match_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`MatchRecord`]s to a JSONL file.
pub struct MatchLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl MatchLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Local::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that numbers matches but writes nowhere.
    pub fn in_memory(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_match_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &MatchRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.played_at.is_none() {
            rec.played_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lines_carry_a_time_prefix() {
        let mut log = MatchLog::new();
        log.push("Card selected: Mage");
        let line = &log.lines()[0];
        assert_eq!(line.len(), "HH:MM:SS - Card selected: Mage".len());
        assert_eq!(&line[2..3], ":");
        assert!(line.ends_with(" - Card selected: Mage"));
        assert!(log.contains("selected"));
    }

    #[test]
    fn ids_are_sequential_per_logger() {
        let mut logger = MatchLogger::in_memory("20260101");
        assert_eq!(logger.next_id(), "20260101-000001");
        assert_eq!(logger.next_id(), "20260101-000002");
    }

    #[test]
    fn summary_lists_the_three_statistics() {
        assert_eq!(
            format_summary(2, 11, 7),
            "Cards eliminated: 2\nDamage dealt: 11\nDamage received: 7"
        );
    }
}
