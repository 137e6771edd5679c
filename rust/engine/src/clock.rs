use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// Which of the two match countdowns a tick belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockKind {
    Total,
    Action,
}

/// A countdown from `full` to zero, one unit per tick.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    full: u32,
    remaining: u32,
}

impl Countdown {
    pub fn new(full: u32) -> Self {
        Self {
            full,
            remaining: full,
        }
    }

    pub fn full(&self) -> u32 {
        self.full
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    pub fn reset(&mut self) {
        self.remaining = self.full;
    }

    /// Decrements once. Returns `true` only on the tick that reaches zero;
    /// an expired countdown stays at zero until reset.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

/// Remaining match-total and per-action time.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchClock {
    pub total: Countdown,
    pub action: Countdown,
}

impl MatchClock {
    pub fn new(total_secs: u32, action_secs: u32) -> Self {
        Self {
            total: Countdown::new(total_secs),
            action: Countdown::new(action_secs),
        }
    }
}

/// What a single clock tick did to the match.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickOutcome {
    /// The match is already decided; nothing changed
    Ignored,
    /// The countdown moved on and has time left
    Running { remaining: u32 },
    /// The action clock expired on the player's turn and the placement was forfeited
    Forfeited,
    /// The action clock expired outside the player's turn; no effect
    Expired,
    /// The total clock ran out and decided the match
    Finished { outcome: Outcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_reports_zero_exactly_once() {
        let mut c = Countdown::new(2);
        assert!(!c.tick());
        assert!(c.tick());
        assert!(c.is_expired());
        assert!(!c.tick());
        assert_eq!(c.remaining(), 0);
        c.reset();
        assert_eq!(c.remaining(), 2);
    }
}
