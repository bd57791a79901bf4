//! FileStore behavior against a real temp directory.

use anyhow::Result;
use greenlight_runtime::{FileStore, StateStore};

#[test]
fn load_missing_file_is_none_not_error() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path().join("consent.json"));

    assert!(store.load()?.is_none());
    Ok(())
}

#[test]
fn save_then_load_roundtrips_bytes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path().join("consent.json"));

    store.save(br#"{"consents":{}}"#)?;
    assert_eq!(store.load()?.as_deref(), Some(br#"{"consents":{}}"#.as_ref()));
    Ok(())
}

#[test]
fn save_creates_missing_parent_directories() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path().join("nested/deeper/consent.json"));

    store.save(b"{}")?;
    assert_eq!(store.load()?.as_deref(), Some(b"{}".as_ref()));
    Ok(())
}

#[test]
fn save_overwrites_previous_state() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path().join("consent.json"));

    store.save(b"old")?;
    store.save(b"new")?;
    assert_eq!(store.load()?.as_deref(), Some(b"new".as_ref()));
    Ok(())
}
