//! Local key/value persistence capability.
//!
//! One logical key, opaque bytes. Any local file, embedded KV store, or
//! in-memory map satisfies the contract; `FileStore` is the shipped default.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("state read failed: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("state write failed: {0}")]
    WriteFailed(#[source] io::Error),
}

/// Durable storage for a single state blob.
///
/// `load` returning `Ok(None)` means "nothing persisted yet" and is not an
/// error. Implementations must be safe to call from multiple threads.
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError>;
    fn save(&self, bytes: &[u8]) -> Result<(), StoreError>;
}

/// One key, one file on local disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadFailed(e)),
        }
    }

    fn save(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::WriteFailed)?;
        }
        fs::write(&self.path, bytes).map_err(StoreError::WriteFailed)
    }
}
