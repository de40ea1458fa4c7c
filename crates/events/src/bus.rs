//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`QueueEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` between the queue service
//! and any number of rendering subscribers.

use serde::Serialize;
use tokio::sync::broadcast;

use polymuse_core::types::GenerationId;

// ---------------------------------------------------------------------------
// QueueEvent
// ---------------------------------------------------------------------------

/// A mutation of the queue store, as observed by subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum QueueEvent {
    /// New records were prepended (optimistic insert or poll discovery).
    Inserted { ids: Vec<GenerationId> },
    /// Existing records were overwritten in place by a server snapshot.
    Updated { ids: Vec<GenerationId> },
    /// Records were removed by an explicit delete.
    Removed { ids: Vec<GenerationId> },
    /// Per-kind counts changed.
    CountsChanged { image: u32, video: u32, chat: u32 },
    /// The poll loop started because a pending record appeared.
    PollStarted,
    /// The poll loop stopped because the pending set drained.
    PollStopped,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`QueueEvent`].
pub struct EventBus {
    sender: broadcast::Sender<QueueEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: QueueEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
