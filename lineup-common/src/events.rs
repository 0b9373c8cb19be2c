//! Event types for the lineup push channel
//!
//! Events are broadcast via [`EventBus`] inside the server and streamed to
//! exhibitors as Server-Sent Events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::notify::{AlertKey, NotificationRule};

/// Push channel name advertised to clients
pub const PUSH_CHANNEL: &str = "table-time";

/// SSE event name of a breed call
pub const BREED_NOTIFICATION_EVENT: &str = "breed-notification";

/// Lineup event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LineupEvent {
    /// Exhibitor saved selections
    SubmissionCreated {
        submission_ids: Vec<i64>,
        exhibitor_id: String,
        category_id: i64,
        show_id: i64,
        timestamp: DateTime<Utc>,
    },

    /// Organizer saved a lineup
    ///
    /// Emitted after the BreedCalled events for the same lineup.
    LineupSaved {
        lineup_id: i64,
        category_id: i64,
        show_id: i64,
        breeds: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// A breed in a saved lineup matched an exhibitor's submission
    BreedCalled {
        lineup_id: i64,
        breed: String,
        category: String,
        show: String,
        exhibitor_id: String,
        timestamp: DateTime<Utc>,
    },

    /// All lineups were cleared; clients reset their notification history
    LineupsCleared { timestamp: DateTime<Utc> },
}

impl LineupEvent {
    /// Variant name, matches the serialized `type` tag
    pub fn event_type(&self) -> &'static str {
        match self {
            LineupEvent::SubmissionCreated { .. } => "SubmissionCreated",
            LineupEvent::LineupSaved { .. } => "LineupSaved",
            LineupEvent::BreedCalled { .. } => "BreedCalled",
            LineupEvent::LineupsCleared { .. } => "LineupsCleared",
        }
    }

    /// SSE `event:` field used on the push channel
    pub fn channel_event_name(&self) -> &'static str {
        match self {
            LineupEvent::SubmissionCreated { .. } => "submission-created",
            LineupEvent::LineupSaved { .. } => "lineup-saved",
            LineupEvent::BreedCalled { .. } => BREED_NOTIFICATION_EVENT,
            LineupEvent::LineupsCleared { .. } => "lineups-cleared",
        }
    }

    /// Dispatcher key of a breed call
    pub fn alert_key(&self) -> Option<AlertKey> {
        match self {
            LineupEvent::BreedCalled {
                breed,
                category,
                show,
                exhibitor_id,
                ..
            } => Some(AlertKey::new(
                &NotificationRule::new(breed.clone(), category.clone(), show.clone()),
                exhibitor_id.clone(),
            )),
            _ => None,
        }
    }
}

/// Central event distribution bus
///
/// Wraps `tokio::sync::broadcast`: publishing never blocks, slow subscribers
/// observe a lag error and lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LineupEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<LineupEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: LineupEvent) -> Result<usize, broadcast::error::SendError<LineupEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: LineupEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breed_called() -> LineupEvent {
        LineupEvent::BreedCalled {
            lineup_id: 7,
            breed: "Holland Lop".to_string(),
            category: "Youth".to_string(),
            show: "A".to_string(),
            exhibitor_id: "ex-1".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn eventbus_delivers_to_every_subscriber() {
        let bus = EventBus::new(10);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(breed_called()).expect("emit should succeed");

        assert_eq!(rx1.try_recv().unwrap().event_type(), "BreedCalled");
        assert_eq!(rx2.try_recv().unwrap().event_type(), "BreedCalled");
    }

    #[test]
    fn emit_without_subscribers_fails_but_lossy_does_not_panic() {
        let bus = EventBus::new(2);
        assert!(bus.emit(breed_called()).is_err());

        let _rx = bus.subscribe();
        for _ in 0..10 {
            bus.emit_lossy(LineupEvent::LineupsCleared { timestamp: Utc::now() });
        }
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn serialized_type_tag_matches_event_type() {
        let event = breed_called();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
        assert_eq!(json["breed"], "Holland Lop");

        let back: LineupEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn breed_call_uses_notification_event_name_and_key() {
        let event = breed_called();
        assert_eq!(event.channel_event_name(), "breed-notification");

        let key = event.alert_key().unwrap();
        assert_eq!(key.breed, "Holland Lop");
        assert_eq!(key.exhibitor_id, "ex-1");

        assert!(LineupEvent::LineupsCleared { timestamp: Utc::now() }
            .alert_key()
            .is_none());
    }
}
