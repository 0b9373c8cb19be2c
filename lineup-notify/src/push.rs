//! Push listener
//!
//! Subscribes to the server's event stream. Breed calls go to the same
//! dispatcher the poller uses; a cleared lineup resets the notified set.

use futures::StreamExt;
use lineup_common::events::LineupEvent;
use lineup_common::notify::{Alert, AlertSource, NotificationDispatcher};
use lineup_common::sse::SseDecoder;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{ClientError, LineupClient};

/// What the listener did with one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    /// Already delivered, or meant for another exhibitor
    Suppressed,
    Reset,
    Ignored,
}

pub struct PushListener {
    client: LineupClient,
    dispatcher: Arc<NotificationDispatcher>,
    exhibitor_filter: Option<String>,
    reconnect_delay: Duration,
}

impl PushListener {
    pub fn new(
        client: LineupClient,
        dispatcher: Arc<NotificationDispatcher>,
        exhibitor_filter: Option<String>,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            client,
            dispatcher,
            exhibitor_filter,
            reconnect_delay,
        }
    }

    /// Apply one event to the dispatcher
    pub fn handle_event(&self, event: &LineupEvent) -> PushOutcome {
        handle_push_event(&self.dispatcher, self.exhibitor_filter.as_deref(), event)
    }

    /// Read the event stream until the server closes it
    pub async fn listen_once(&self) -> Result<(), ClientError> {
        let response = self.client.open_event_stream().await?;
        info!("Subscribed to push channel at {}/api/events", self.client.base_url());

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| ClientError::NetworkError(e.to_string()))?;

            for frame in decoder.push(&chunk) {
                match frame.lineup_event() {
                    Ok(event) => {
                        let outcome = self.handle_event(&event);
                        debug!("Push event {}: {:?}", event.event_type(), outcome);
                    }
                    Err(e) => warn!("Unreadable push event {:?}: {}", frame.event, e),
                }
            }
        }

        Ok(())
    }

    /// Spawn the listener; it resubscribes after the stream drops
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match self.listen_once().await {
                    Ok(()) => warn!("Push channel closed by server"),
                    Err(e) => warn!("Push channel unavailable: {}", e),
                }
                tokio::time::sleep(self.reconnect_delay).await;
            }
        })
    }
}

/// Route a push event to the dispatcher
///
/// Breed calls for other exhibitors are dropped when a filter is set.
pub fn handle_push_event(
    dispatcher: &NotificationDispatcher,
    exhibitor_filter: Option<&str>,
    event: &LineupEvent,
) -> PushOutcome {
    match event {
        LineupEvent::BreedCalled { exhibitor_id, .. } => {
            if exhibitor_filter.is_some_and(|id| id != exhibitor_id) {
                return PushOutcome::Suppressed;
            }
            let Some(key) = event.alert_key() else {
                return PushOutcome::Ignored;
            };
            if dispatcher.dispatch(Alert::new(key, AlertSource::Push)) {
                PushOutcome::Delivered
            } else {
                PushOutcome::Suppressed
            }
        }
        LineupEvent::LineupsCleared { .. } => {
            dispatcher.reset();
            PushOutcome::Reset
        }
        _ => PushOutcome::Ignored,
    }
}
