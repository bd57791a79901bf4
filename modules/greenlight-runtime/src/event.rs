//! The event value type carried by the host bus. Domain-agnostic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of event this is. The serde tag is the wire/channel name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A request to change consent state, or the audit echo of one.
    ConsentUpdate,
    /// The consent read channel: get-requests and their responses.
    Consent,
}

/// Which side of a channel an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    RequestContent,
    ResponseContent,
}

/// An event as delivered by the host bus. The bus assigns nothing; the
/// producer builds the whole thing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub event_type: EventType,
    pub source: EventSource,
    pub payload: Option<serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    /// Set on responses: the id of the event being answered.
    pub parent_id: Option<Uuid>,
}

impl Event {
    /// Create an event with a fresh id, stamped now, no payload.
    pub fn new(name: impl Into<String>, event_type: EventType, source: EventSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            event_type,
            source,
            payload: None,
            timestamp: Utc::now(),
            parent_id: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = ts;
        self
    }

    /// Build a response on the same channel, correlated to `request`.
    pub fn response_to(request: &Event, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            event_type: request.event_type,
            source: EventSource::ResponseContent,
            payload: None,
            timestamp: Utc::now(),
            parent_id: Some(request.id),
        }
    }
}
