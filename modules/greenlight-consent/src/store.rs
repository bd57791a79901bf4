//! Typed persistence adapter: one `ConsentRecord` under one well-known key.

use std::io;
use std::sync::Arc;

use greenlight_runtime::{StateStore, StoreError};

use crate::codec;
use crate::preferences::ConsentRecord;

/// Loads and saves the current record over the host's byte-level store.
/// Absence of the key means "no prior consent".
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<dyn StateStore>,
}

impl RecordStore {
    pub fn new(inner: Arc<dyn StateStore>) -> Self {
        Self { inner }
    }

    pub fn load(&self) -> Result<Option<ConsentRecord>, StoreError> {
        let Some(bytes) = self.inner.load()? else {
            return Ok(None);
        };
        let payload: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::ReadFailed(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        let record = codec::decode_record(&payload).map_err(|e| {
            StoreError::ReadFailed(io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
        })?;
        Ok(Some(record))
    }

    pub fn save(&self, record: &ConsentRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&codec::encode_record(record))
            .map_err(|e| StoreError::WriteFailed(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        self.inner.save(&bytes)
    }
}
