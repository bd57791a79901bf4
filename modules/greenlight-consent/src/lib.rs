//! Consent-state aggregator.
//!
//! Listens for consent-update events on the host bus, merges each partial
//! update into a single canonical record, persists it, and republishes it as
//! shared state so other components can read the current posture. Merge
//! semantics are field-level overwrite by arrival order; see
//! [`preferences::ConsentRecord::merged`].

pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod preferences;
pub mod store;

pub use config::ConsentConfig;
pub use controller::{ConsentController, EXTENSION_NAME};
pub use error::DecodeError;
pub use preferences::{ConsentRecord, ConsentStatus, ConsentUpdate};
pub use store::RecordStore;
