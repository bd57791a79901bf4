//! ConsentController — the merge/publish engine.
//!
//! Lifecycle: constructed `Uninitialized`, becomes `Ready` exactly once in
//! `register`, which loads the persisted record (or seeds a default) and
//! subscribes the two listeners. After that everything is request/response
//! against the in-memory record, which is the single authoritative copy —
//! persistence is a best-effort durable shadow of it.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};
use uuid::Uuid;

use greenlight_runtime::{
    Event, EventBus, EventSource, EventType, FileStore, StatePublisher, StateStore,
};

use crate::codec;
use crate::config::ConsentConfig;
use crate::error::DecodeError;
use crate::preferences::ConsentRecord;
use crate::store::RecordStore;

/// Identity under which shared state is published.
pub const EXTENSION_NAME: &str = "greenlight.consent";

pub struct ConsentController {
    config: ConsentConfig,
    bus: Arc<dyn EventBus>,
    publisher: Arc<dyn StatePublisher>,
    store: RecordStore,
    current: Mutex<ConsentRecord>,
}

impl ConsentController {
    pub fn new(
        config: ConsentConfig,
        bus: Arc<dyn EventBus>,
        publisher: Arc<dyn StatePublisher>,
        store: Arc<dyn StateStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            bus,
            publisher,
            store: RecordStore::new(store),
            current: Mutex::new(ConsentRecord::empty()),
        })
    }

    /// Convenience: a controller persisting through the file store at the
    /// configured `store_path`.
    pub fn with_file_store(
        config: ConsentConfig,
        bus: Arc<dyn EventBus>,
        publisher: Arc<dyn StatePublisher>,
    ) -> Arc<Self> {
        let store = Arc::new(FileStore::new(config.store_path.clone()));
        Self::new(config, bus, publisher, store)
    }

    /// Transition `Uninitialized → Ready`: load the current record from
    /// persistence (read failure or absence falls back to the configured
    /// default posture), subscribe the listeners, and republish a non-empty
    /// record so late-starting components can read the persisted posture.
    pub fn register(self: &Arc<Self>) {
        let record = match self.store.load() {
            Ok(Some(record)) => record,
            Ok(None) => self.seed_record(),
            Err(e) => {
                warn!(error = %e, "could not read persisted consent, starting from defaults");
                self.seed_record()
            }
        };
        *self.lock_current() = record.clone();

        let controller = Arc::clone(self);
        self.bus.subscribe(
            EventType::ConsentUpdate,
            EventSource::RequestContent,
            Box::new(move |event| controller.on_update(event)),
        );
        let controller = Arc::clone(self);
        self.bus.subscribe(
            EventType::Consent,
            EventSource::RequestContent,
            Box::new(move |event| controller.on_get(event)),
        );

        info!(
            categories = record.categories.len(),
            "consent controller registered"
        );

        if !record.is_empty() {
            // No triggering event to version by at startup, so mint one.
            self.publisher
                .publish(EXTENSION_NAME, Uuid::new_v4(), codec::encode_record(&record));
        }
    }

    /// Snapshot of the current record.
    pub fn current(&self) -> ConsentRecord {
        self.lock_current().clone()
    }

    /// Handle a consent-update event: decode, merge, persist, publish,
    /// audit. Non-consent payloads and empty updates are silent no-ops.
    fn on_update(&self, event: &Event) {
        let Some(payload) = event.payload.as_ref() else {
            debug!(id = %event.id, "consent update without payload, ignoring");
            return;
        };
        let update = match codec::decode_update(payload, event.timestamp) {
            Ok(update) => update,
            Err(DecodeError::NotConsentPayload) => {
                debug!(id = %event.id, "not a consent payload, ignoring");
                return;
            }
        };
        if update.is_empty() {
            debug!(id = %event.id, "consent update names no categories, ignoring");
            return;
        }

        // Read-merge-replace is one critical section: two racing updates
        // must never both merge against the same stale record.
        let merged = {
            let mut current = self.lock_current();
            let merged = current.merged(&update);
            *current = merged.clone();
            merged
        };

        if let Err(e) = self.store.save(&merged) {
            warn!(id = %event.id, error = %e, "consent write failed, in-memory record still advances");
        }

        self.publisher
            .publish(EXTENSION_NAME, event.id, codec::encode_record(&merged));

        if self.config.emit_audit_events {
            let audit = Event::response_to(event, "Consent Update Applied")
                .with_payload(codec::encode_record(&merged));
            self.bus.dispatch(audit);
        }
    }

    /// Handle a get-request: answer from memory, correlated to the request.
    fn on_get(&self, event: &Event) {
        let snapshot = self.lock_current().clone();
        let response = Event::response_to(event, "Consent Response")
            .with_payload(codec::encode_record(&snapshot));
        self.bus.dispatch(response);
    }

    fn seed_record(&self) -> ConsentRecord {
        ConsentRecord {
            categories: self.config.default_categories.clone(),
            last_updated: None,
        }
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, ConsentRecord> {
        // Merges are total, so the record inside a poisoned lock is still
        // valid; recover it rather than halting consent processing.
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
