//! Host bus and shared-state seams.
//!
//! Both are exclusively owned by the host and injected into extensions at
//! construction. The bus guarantees serialized delivery: at most one event is
//! being handled at a time for a given listener.

use uuid::Uuid;

use crate::event::{Event, EventSource, EventType};

/// A registered event handler. Called synchronously by the bus.
pub type Listener = Box<dyn Fn(&Event) + Send + Sync>;

/// The host's event dispatch/subscription mechanism.
pub trait EventBus: Send + Sync {
    /// Register `listener` for events matching `event_type` and `source`.
    fn subscribe(&self, event_type: EventType, source: EventSource, listener: Listener);

    /// Hand an event to the host for delivery.
    fn dispatch(&self, event: Event);
}

/// The host's shared-state registry: versioned snapshots other components
/// can read without direct coupling to the publisher.
pub trait StatePublisher: Send + Sync {
    /// Publish `state` under `owner`'s identity. `version` correlates the
    /// snapshot to the event that produced it.
    fn publish(&self, owner: &str, version: Uuid, state: serde_json::Value);
}
