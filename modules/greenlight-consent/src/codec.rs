//! Wire codec for consent payloads.
//!
//! Wire shape, shared by update events, the persisted record, shared state,
//! and get-responses:
//!
//! ```json
//! {
//!   "consents": {
//!     "collect":  { "val": "y" },
//!     "adId":     { "val": "n" },
//!     "metadata": { "time": "2026-08-06T12:00:00+00:00" }
//!   }
//! }
//! ```
//!
//! Decoding is tolerant: shape-level problems (no `consents` mapping) reject
//! the payload as not-ours; entry-level problems (unknown tokens, malformed
//! entries, unparsable timestamps) degrade to `Unknown` / the arrival time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::DecodeError;
use crate::preferences::{ConsentRecord, ConsentStatus, ConsentUpdate};

const CONSENTS_KEY: &str = "consents";
const METADATA_KEY: &str = "metadata";
const TIME_KEY: &str = "time";
const VAL_KEY: &str = "val";

/// Decode an update-event payload into a partial update. `arrival` is the
/// event's own timestamp, used when the payload carries no usable
/// `metadata.time` so every merged record carries a time.
pub fn decode_update(payload: &Value, arrival: DateTime<Utc>) -> Result<ConsentUpdate, DecodeError> {
    let (categories, time) = interpret(payload)?;
    Ok(ConsentUpdate {
        categories,
        time: time.unwrap_or(arrival),
    })
}

/// Decode a full record, e.g. from persisted bytes. A record persisted
/// before any update keeps `last_updated = None`.
pub fn decode_record(payload: &Value) -> Result<ConsentRecord, DecodeError> {
    let (categories, time) = interpret(payload)?;
    Ok(ConsentRecord {
        categories,
        last_updated: time,
    })
}

/// Encode a record to the wire shape. Exact inverse of decoding for the
/// `y`/`n` tokens; a category explicitly set to Unknown is emitted with the
/// `u` token rather than dropped, so explicitly-set-to-unknown and never-set
/// stay distinguishable. `metadata` is omitted for a never-updated record.
pub fn encode_record(record: &ConsentRecord) -> Value {
    let mut consents = Map::new();
    for (category, status) in &record.categories {
        let mut entry = Map::new();
        entry.insert(VAL_KEY.to_string(), Value::String(status.token().to_string()));
        consents.insert(category.clone(), Value::Object(entry));
    }
    if let Some(time) = record.last_updated {
        let mut metadata = Map::new();
        metadata.insert(TIME_KEY.to_string(), Value::String(time.to_rfc3339()));
        consents.insert(METADATA_KEY.to_string(), Value::Object(metadata));
    }

    let mut payload = Map::new();
    payload.insert(CONSENTS_KEY.to_string(), Value::Object(consents));
    Value::Object(payload)
}

/// Pull categories and the optional metadata time out of a payload.
/// Anything without a `consents` mapping is not a consent payload.
fn interpret(
    payload: &Value,
) -> Result<(BTreeMap<String, ConsentStatus>, Option<DateTime<Utc>>), DecodeError> {
    let consents = payload
        .get(CONSENTS_KEY)
        .and_then(Value::as_object)
        .ok_or(DecodeError::NotConsentPayload)?;

    let mut categories = BTreeMap::new();
    let mut time = None;
    for (key, entry) in consents {
        if key == METADATA_KEY {
            time = parse_time(entry);
        } else {
            categories.insert(key.clone(), decode_status(entry));
        }
    }
    Ok((categories, time))
}

fn decode_status(entry: &Value) -> ConsentStatus {
    match entry.get(VAL_KEY).and_then(Value::as_str) {
        Some(token) => ConsentStatus::from_token(token),
        // Not an object, or no string `val`: still a category the caller
        // named, just one we can't read.
        None => ConsentStatus::Unknown,
    }
}

fn parse_time(metadata: &Value) -> Option<DateTime<Utc>> {
    let raw = metadata.get(TIME_KEY).and_then(Value::as_str)?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(raw, error = %e, "unparsable consent metadata time, using arrival time");
            None
        }
    }
}
