//! Push channel
//!
//! Streams lineup events to exhibitors as Server-Sent Events.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use lineup_common::events::{BREED_NOTIFICATION_EVENT, PUSH_CHANNEL};
use lineup_common::sse::to_sse_event;
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use crate::AppState;

/// Path of the event stream, advertised by /api/push-config
pub const EVENT_STREAM_PATH: &str = "/api/events";

/// GET /api/events - SSE event stream
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New SSE client connected");

    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => match to_sse_event(&event) {
                Ok(sse) => {
                    debug!("Broadcasting SSE event: {}", event.event_type());
                    Some(Ok(sse))
                }
                Err(e) => {
                    warn!("Failed to serialize event: {}", e);
                    None
                }
            },
            Err(e) => {
                // Lagged: the receiver skipped events
                warn!("SSE stream error: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[derive(Debug, Serialize)]
pub struct PushConfig {
    pub channel: &'static str,
    pub event: &'static str,
    pub stream: &'static str,
}

/// GET /api/push-config - where clients subscribe for breed calls
pub async fn push_config() -> Json<PushConfig> {
    Json(PushConfig {
        channel: PUSH_CHANNEL,
        event: BREED_NOTIFICATION_EVENT,
        stream: EVENT_STREAM_PATH,
    })
}
