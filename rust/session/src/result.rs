use lastturn_engine::logger::MatchRecord;
use lastturn_engine::outcome::{EndReason, Outcome};
use serde::{Deserialize, Serialize};

/// Payload of the one-shot result event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: String,
    pub outcome: Outcome,
    pub reason: EndReason,
    pub damage_dealt: u32,
    pub damage_received: u32,
    pub cards_eliminated: u32,
}

impl From<&MatchRecord> for MatchResult {
    fn from(record: &MatchRecord) -> Self {
        Self {
            match_id: record.match_id.clone(),
            outcome: record.outcome,
            reason: record.reason,
            damage_dealt: record.damage_dealt,
            damage_received: record.damage_received,
            cards_eliminated: record.cards_eliminated,
        }
    }
}

/// Delivery state of the result event for the current match.
///
/// `Empty` means no result exists yet; `Acknowledged` means one existed and
/// the consumer has taken it. A new match resets to `Empty`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "result", rename_all = "snake_case")]
pub enum ResultState {
    #[default]
    Empty,
    Pending(MatchResult),
    Acknowledged(MatchResult),
}

impl ResultState {
    /// Stores a result. Only the first publication of a match takes effect.
    pub fn publish(&mut self, result: MatchResult) -> bool {
        if !matches!(self, ResultState::Empty) {
            return false;
        }
        *self = ResultState::Pending(result);
        true
    }

    /// Marks a pending result as consumed and returns it. Anything else is
    /// left alone.
    pub fn acknowledge(&mut self) -> Option<MatchResult> {
        let ResultState::Pending(result) = self else {
            return None;
        };
        let result = result.clone();
        *self = ResultState::Acknowledged(result.clone());
        Some(result)
    }

    pub fn pending(&self) -> Option<&MatchResult> {
        match self {
            ResultState::Pending(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending().is_some()
    }
}
