//! Periodic tick sources for the match clocks.
//!
//! Each match gets two independent interval tasks, one per [`ClockKind`].
//! They only send signals; the session actor owns the countdowns. Both tasks
//! share one cancellation token, so a [`ClockHandle`] stops them together.

use lastturn_engine::clock::ClockKind;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// One tick from one clock. `generation` identifies the match that started
/// the clock so late signals from a replaced match can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSignal {
    pub kind: ClockKind,
    pub generation: u64,
}

/// Owns the two clock tasks of one match. Dropping it cancels them.
#[derive(Debug)]
pub struct ClockHandle {
    token: CancellationToken,
    generation: u64,
}

impl ClockHandle {
    /// Spawns both clock tasks. Must be called inside a tokio runtime.
    pub fn start(generation: u64, period: Duration, tx: mpsc::Sender<ClockSignal>) -> Self {
        let token = CancellationToken::new();
        for kind in [ClockKind::Total, ClockKind::Action] {
            tokio::spawn(run_clock(kind, generation, period, tx.clone(), token.clone()));
        }
        tracing::debug!(generation, period_ms = period.as_millis() as u64, "clocks started");
        Self { token, generation }
    }

    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::debug!(generation = self.generation, "clocks cancelled");
            self.token.cancel();
        }
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_clock(
    kind: ClockKind,
    generation: u64,
    period: Duration,
    tx: mpsc::Sender<ClockSignal>,
    token: CancellationToken,
) {
    // First tick one full period after start, not immediately.
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                if tx.send(ClockSignal { kind, generation }).await.is_err() {
                    break;
                }
            }
        }
    }
    tracing::trace!(?kind, generation, "clock task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn both_clocks_tick_once_per_period_until_cancelled() {
        let (tx, mut rx) = mpsc::channel(16);
        let handle = ClockHandle::start(7, Duration::from_secs(1), tx);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let mut signals = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            signals.push(signal);
        }
        assert_eq!(signals.len(), 4);
        assert!(signals.iter().all(|s| s.generation == 7));
        assert_eq!(
            signals.iter().filter(|s| s.kind == ClockKind::Total).count(),
            2
        );

        drop(handle);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
