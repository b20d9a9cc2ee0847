// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live state streaming for desk displays.
//!
//! Events are informational only. They tell connected clients that a roster
//! changed; clients fetch the authoritative state over HTTP.
//!
//! - Events go to every connected client, optionally narrowed to one roster
//! - No commands are executed over WebSocket connections
//! - No audit events are emitted for streaming activity

use axum::{
    extract::{
        Query, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{
    SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// Slow clients lose the oldest events.
const EVENT_BUFFER_SIZE: usize = 100;

/// Live state event types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A command was committed to a roster.
    Committed {
        /// The roster name.
        roster: String,
        /// The command's action name.
        action: String,
        /// Audit sequence of the command's event.
        audit_sequence: u64,
        /// Automatic steps that followed the command.
        auto_steps: usize,
        /// Slots bound after the transition.
        assigned: usize,
        /// Size of the catalog.
        total_slots: usize,
        /// Whose turn it is now.
        next_picker: Option<String>,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
}

/// Broadcaster for live state events.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// If no clients are connected, the event is dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to the event stream.
    ///
    /// Events sent before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters for the live stream.
#[derive(Debug, Default, Deserialize)]
pub struct LiveQuery {
    /// Only stream events for this roster. All rosters when absent.
    pub roster: Option<String>,
}

impl LiveQuery {
    /// Returns true if the client asked for this event.
    #[must_use]
    pub fn wants(&self, event: &LiveEvent) -> bool {
        match (self.roster.as_deref(), event) {
            (Some(wanted), LiveEvent::Committed { roster, .. }) => wanted == roster,
            _ => true,
        }
    }
}

fn connected_now() -> LiveEvent {
    LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| String::from("unknown")),
    }
}

/// Upgrades the connection to a WebSocket and streams live events.
///
/// `GET /live?roster=<name>` narrows the stream to one roster.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<LiveQuery>,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster, query))
}

async fn handle_socket(
    socket: WebSocket,
    broadcaster: Arc<LiveEventBroadcaster>,
    query: LiveQuery,
) {
    info!(roster = ?query.roster, "Desk display connected");

    let (mut sender, mut receiver) = socket.split();
    let rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    if let Ok(json) = serde_json::to_string(&connected_now())
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(forward_events(rx, sender, query));

    // Clients never send commands here; drain until they hang up.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => break,
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    debug!("Ignoring client message on live stream");
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Desk display disconnected");
}

async fn forward_events(
    mut rx: broadcast::Receiver<LiveEvent>,
    mut sender: SplitSink<WebSocket, Message>,
    query: LiveQuery,
) {
    loop {
        let event: LiveEvent = match rx.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Desk display lagged; events dropped");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => return,
        };
        if !query.wants(&event) {
            continue;
        }
        let json: String = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                error!(?e, "Failed to serialize live event");
                continue;
            }
        };
        if sender.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }
}
