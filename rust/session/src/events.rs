use crate::result::MatchResult;
use lastturn_engine::cards::CardId;
use lastturn_engine::combat::LaneResult;
use lastturn_engine::game::TurnState;
use lastturn_engine::player::SideId;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

// Per-subscriber buffer; a subscriber whose buffer is full is dropped.
const EVENT_CHANNEL_BUFFER: usize = 1000;

pub type EventSender = mpsc::Sender<MatchEvent>;
pub type EventReceiver = mpsc::Receiver<MatchEvent>;

/// Change notifications published by a running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    MatchStarted {
        match_id: String,
        player_name: String,
        board_size: usize,
    },
    CardSelected {
        card_id: CardId,
    },
    CardPlaced {
        side: SideId,
        card_id: CardId,
        slot: usize,
    },
    IntentRejected {
        reason: String,
    },
    TurnChanged {
        turn: TurnState,
    },
    ClockForfeit,
    CombatResolved {
        lanes: Vec<LaneResult>,
        player_health: u32,
        opponent_health: u32,
    },
    MatchEnded {
        result: MatchResult,
    },
}

pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.subscriber_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (subscriber_id, receiver) = self.subscribe_raw();
        EventSubscription {
            bus: self.clone(),
            subscriber_id,
            receiver,
        }
    }

    fn subscribe_raw(&self) -> (usize, EventReceiver) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, tx));

        tracing::debug!(subscriber_id = id, "subscribed to match events");
        (id, rx)
    }

    pub fn broadcast(&self, event: MatchEvent) {
        tracing::debug!(event_type = ?event, "broadcasting match event");

        let subscribers = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut failed = Vec::new();
        for (id, sender) in subscribers {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(
                    subscriber_id = id,
                    error = ?e,
                    "failed to send event to subscriber"
                );
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&failed);
        }
    }

    pub fn unsubscribe(&self, subscriber_id: usize) {
        self.remove_subscribers(&[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| !ids.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_drop_unsubscribes() {
        let bus = EventBus::new();
        {
            let _sub = bus.subscribe();
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn broadcast_reaches_all_subscribers() {
        let bus = EventBus::new();
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        bus.broadcast(MatchEvent::ClockForfeit);

        assert_eq!(sub1.receiver.try_recv().ok(), Some(MatchEvent::ClockForfeit));
        assert_eq!(sub2.receiver.try_recv().ok(), Some(MatchEvent::ClockForfeit));
    }

    #[test]
    fn stale_receiver_is_pruned() {
        let bus = EventBus::new();
        let (id, rx) = bus.subscribe_raw();
        drop(rx);
        bus.broadcast(MatchEvent::IntentRejected {
            reason: "gone".into(),
        });
        assert_eq!(bus.subscriber_count(), 0);
        bus.unsubscribe(id);
    }

    #[test]
    fn events_serialize_with_a_type_tag() {
        let json = serde_json::to_string(&MatchEvent::TurnChanged {
            turn: TurnState::AwaitingOpponent,
        })
        .expect("serialize");
        assert_eq!(json, r#"{"type":"turn_changed","turn":"AWAITING_OPPONENT"}"#);
    }
}
