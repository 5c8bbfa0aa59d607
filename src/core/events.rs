//! Mutation notifications
//!
//! Every successful write on a resource publishes a [`ResourceEvent`] on the
//! [`EventBus`], tagged with the resource's notification key. The bus is a
//! `tokio::sync::broadcast` channel: publishing never blocks and never fails,
//! subscribers that fall behind see `Lagged` on their next `recv()`.
//!
//! ```rust,ignore
//! let bus = EventBus::new(1024);
//! let mut rx = bus.subscribe();
//!
//! let service = syndication_out_service(store, issuer).with_event_bus(bus.clone());
//! service.create_one(draft).await?;
//!
//! let envelope = rx.recv().await?;
//! assert_eq!(envelope.event.resource(), "syndication_out");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A committed mutation on a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ResourceEvent {
    /// A batch of records was created
    Created { resource: String, ids: Vec<Uuid> },
    /// A record was partially updated
    Updated { resource: String, id: Uuid },
    /// A record was replaced
    Replaced { resource: String, id: Uuid },
    /// A record was deleted
    Deleted { resource: String, id: Uuid },
}

impl ResourceEvent {
    /// Notification key of the resource this event relates to
    pub fn resource(&self) -> &str {
        match self {
            ResourceEvent::Created { resource, .. }
            | ResourceEvent::Updated { resource, .. }
            | ResourceEvent::Replaced { resource, .. }
            | ResourceEvent::Deleted { resource, .. } => resource,
        }
    }

    /// Ids of the affected records
    pub fn ids(&self) -> Vec<Uuid> {
        match self {
            ResourceEvent::Created { ids, .. } => ids.clone(),
            ResourceEvent::Updated { id, .. }
            | ResourceEvent::Replaced { id, .. }
            | ResourceEvent::Deleted { id, .. } => vec![*id],
        }
    }

    /// Action name (created, updated, replaced, deleted)
    pub fn action(&self) -> &'static str {
        match self {
            ResourceEvent::Created { .. } => "created",
            ResourceEvent::Updated { .. } => "updated",
            ResourceEvent::Replaced { .. } => "replaced",
            ResourceEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Envelope wrapping an event with delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event was published
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: ResourceEvent,
}

impl EventEnvelope {
    pub fn new(event: ResourceEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per slow receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers
    ///
    /// Returns the number of receivers that will see the event; zero when
    /// nobody is listening.
    pub fn publish(&self, event: ResourceEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() only errors when there are no receivers
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Receive all events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Log every event received on `events` until the bus closes
///
/// A lagging receiver reports how many events it missed and keeps going.
/// Returns the number of events logged.
pub async fn log_events(mut events: broadcast::Receiver<EventEnvelope>) -> usize {
    let mut logged = 0;
    loop {
        match events.recv().await {
            Ok(envelope) => {
                tracing::info!(
                    resource = envelope.event.resource(),
                    action = envelope.event.action(),
                    ids = ?envelope.event.ids(),
                    "resource changed"
                );
                logged += 1;
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "event logger lagged behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    logged
}
