use lastturn_engine::logger::MatchRecord;
use lastturn_engine::outcome::Outcome;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use thiserror::Error;

/// In-memory store of finished matches
#[derive(Debug)]
pub struct HistoryStore {
    matches: RwLock<Vec<MatchRecord>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            matches: RwLock::new(Vec::new()),
        }
    }

    /// Add a match record to the history
    pub fn add_match(&self, record: MatchRecord) -> Result<(), HistoryError> {
        let mut matches = self
            .matches
            .write()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        tracing::debug!(match_id = %record.match_id, outcome = %record.outcome, "match stored");
        matches.push(record);
        Ok(())
    }

    /// Matching records, newest first
    pub fn filter_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, HistoryError> {
        let matches = self
            .matches
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(matches
            .iter()
            .rev()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }

    pub fn calculate_stats(&self) -> Result<MatchStatistics, HistoryError> {
        let matches = self
            .matches
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(MatchStatistics::from_records(matches.iter()))
    }

    pub fn total_matches(&self) -> Result<usize, HistoryError> {
        let matches = self
            .matches
            .read()
            .map_err(|_| HistoryError::StoragePoisoned)?;
        Ok(matches.len())
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter criteria for match history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl MatchFilter {
    fn matches(&self, record: &MatchRecord) -> bool {
        self.outcome.is_none_or(|o| o == record.outcome)
    }
}

/// Aggregates over a set of match records
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchStatistics {
    pub total_matches: usize,
    pub victories: usize,
    pub defeats: usize,
    pub draws: usize,
    /// Victories as a percentage of all matches
    pub win_rate: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_received: f64,
    pub total_cards_eliminated: u64,
}

impl MatchStatistics {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MatchRecord>) -> Self {
        let mut stats = MatchStatistics::default();
        let mut dealt = 0u64;
        let mut received = 0u64;
        for record in records {
            stats.total_matches += 1;
            match record.outcome {
                Outcome::Victory => stats.victories += 1,
                Outcome::Defeat => stats.defeats += 1,
                Outcome::Draw => stats.draws += 1,
            }
            dealt += u64::from(record.damage_dealt);
            received += u64::from(record.damage_received);
            stats.total_cards_eliminated += u64::from(record.cards_eliminated);
        }
        if stats.total_matches > 0 {
            let n = stats.total_matches as f64;
            stats.win_rate = stats.victories as f64 / n * 100.0;
            stats.avg_damage_dealt = dealt as f64 / n;
            stats.avg_damage_received = received as f64 / n;
        }
        stats
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("History storage poisoned")]
    StoragePoisoned,
}
