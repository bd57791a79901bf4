//! Generic, domain-agnostic host-SDK seam.
//!
//! Everything here is owned by the embedding host: the event value type that
//! flows through its dispatch bus, the bus itself, the shared-state registry,
//! and the local key/value persistence capability. Extensions (like the
//! consent aggregator) depend only on these traits and never on a concrete
//! host runtime.
//!
//! Consumers provide their own payload types that serialize to
//! `serde_json::Value`.

pub mod bus;
pub mod event;
pub mod store;

#[cfg(feature = "test-utils")]
pub mod testing;

pub use bus::{EventBus, Listener, StatePublisher};
pub use event::{Event, EventSource, EventType};
pub use store::{FileStore, StateStore, StoreError};
