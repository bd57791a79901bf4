//! Recording doubles for the host seams. Test-only (`test-utils` feature).
//!
//! `RecordingBus` plays the host runtime: it captures subscriptions and
//! dispatched events, and `deliver` routes an event to the matching
//! listeners the way the real bus would — synchronously, one at a time.

use std::io;
use std::sync::Mutex;

use uuid::Uuid;

use crate::bus::{EventBus, Listener, StatePublisher};
use crate::event::{Event, EventSource, EventType};
use crate::store::{StateStore, StoreError};

/// In-memory host bus that records everything.
#[derive(Default)]
pub struct RecordingBus {
    listeners: Mutex<Vec<(EventType, EventSource, Listener)>>,
    dispatched: Mutex<Vec<Event>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the host delivering `event` to every matching listener.
    pub fn deliver(&self, event: Event) {
        let listeners = self.listeners.lock().unwrap();
        for (event_type, source, listener) in listeners.iter() {
            if *event_type == event.event_type && *source == event.source {
                listener(&event);
            }
        }
    }

    /// Events handed to `dispatch` so far, oldest first.
    pub fn dispatched(&self) -> Vec<Event> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn subscription_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    /// Forget dispatched events (registration noise, usually).
    pub fn reset_dispatched(&self) {
        self.dispatched.lock().unwrap().clear();
    }
}

impl EventBus for RecordingBus {
    fn subscribe(&self, event_type: EventType, source: EventSource, listener: Listener) {
        self.listeners
            .lock()
            .unwrap()
            .push((event_type, source, listener));
    }

    fn dispatch(&self, event: Event) {
        self.dispatched.lock().unwrap().push(event);
    }
}

/// A published shared-state snapshot, as captured by `RecordingPublisher`.
#[derive(Debug, Clone)]
pub struct PublishedState {
    pub owner: String,
    pub version: Uuid,
    pub state: serde_json::Value,
}

/// Shared-state registry that records every publication.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<PublishedState>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<PublishedState> {
        self.published.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.published.lock().unwrap().clear();
    }
}

impl StatePublisher for RecordingPublisher {
    fn publish(&self, owner: &str, version: Uuid, state: serde_json::Value) {
        self.published.lock().unwrap().push(PublishedState {
            owner: owner.to_string(),
            version,
            state,
        });
    }
}

/// In-memory `StateStore`.
#[derive(Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
    write_count: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-populated, as if a previous run had persisted `bytes`.
    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes)),
            write_count: Mutex::new(0),
        }
    }

    /// How many times `save` has been called.
    pub fn write_count(&self) -> usize {
        *self.write_count.lock().unwrap()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.bytes.lock().unwrap().clone())
    }

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        *self.bytes.lock().unwrap() = Some(bytes.to_vec());
        *self.write_count.lock().unwrap() += 1;
        Ok(())
    }
}

/// Store whose every operation fails. For durability-gap tests.
#[derive(Default)]
pub struct BrokenStore;

impl StateStore for BrokenStore {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::ReadFailed(io::Error::other("store offline")))
    }

    fn save(&self, _bytes: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::WriteFailed(io::Error::other("store offline")))
    }
}
