// txtsan-core/tests/persistence_tests.rs
//! Persistence behavior against a real directory.

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;
use test_log::test;

use txtsan_core::{
    DeviceIdentity, FileStore, KeyValueStore, MemoryStore, Preset, PresetStore, Rule,
    SanitizerError, SanitizerSession,
};

#[test]
fn device_id_and_presets_survive_reopen() -> Result<()> {
    let dir = TempDir::new()?;

    let (device, saved) = {
        let session = SanitizerSession::open_dir(dir.path())?;
        let saved = session.presets().save(Preset::new("Mine", vec![Rule::new(1, "a", "b")]))?;
        (session.device_id().clone(), saved)
    };

    let reopened = SanitizerSession::open_dir(dir.path())?;
    assert_eq!(reopened.device_id(), &device);
    assert_eq!(reopened.presets().get(&saved.id)?.name, "Mine");

    let raw = fs::read_to_string(dir.path().join("device_id"))?;
    assert_eq!(raw, device.to_string());
    assert!(dir.path().join(format!("presets_{}.json", device)).exists());
    Ok(())
}

#[test]
fn stored_preset_file_is_a_plain_json_array() -> Result<()> {
    let dir = TempDir::new()?;
    let session = SanitizerSession::open_dir(dir.path())?;
    session.presets().save(Preset::new("Mine", vec![]))?;

    let path = dir.path().join(format!("presets_{}.json", session.device_id()));
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    let array = value.as_array().expect("array");
    let mine = array.iter().find(|p| p["name"] == "Mine").expect("saved preset");
    assert_eq!(mine["isDefault"], false);
    assert!(mine["createdAt"].is_string());
    Ok(())
}

#[test]
fn separate_origins_are_isolated() -> Result<()> {
    let a = SanitizerSession::open(Arc::new(MemoryStore::new()))?;
    let b = SanitizerSession::open(Arc::new(MemoryStore::new()))?;
    assert_ne!(a.device_id(), b.device_id());

    a.presets().save(Preset::new("Only on A", vec![]))?;
    assert!(b.presets().find_by_name("Only on A")?.is_none());
    Ok(())
}

#[test]
fn history_is_namespaced_by_device() -> Result<()> {
    let dir = TempDir::new()?;
    let session = SanitizerSession::open_dir(dir.path())?;
    session.sanitize("a b", "No Spaces")?;
    assert_eq!(session.history().list()?.len(), 1);

    // A different origin (different directory) sees nothing.
    let other_dir = TempDir::new()?;
    let other = SanitizerSession::open_dir(other_dir.path())?;
    assert!(other.history().list()?.is_empty());
    Ok(())
}

#[test]
fn two_writers_do_not_silently_lose_updates() -> Result<()> {
    let dir = TempDir::new()?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path())?);
    let identity = DeviceIdentity::new(Arc::clone(&store));
    let first = PresetStore::new(&identity)?;
    let second = PresetStore::new(&identity)?;

    first.save(Preset::new("From first", vec![]))?;
    second.save(Preset::new("From second", vec![]))?;

    // Each save re-reads before writing, so both survive.
    assert!(first.find_by_name("From first")?.is_some());
    assert!(first.find_by_name("From second")?.is_some());
    Ok(())
}

#[test]
fn corrupt_history_file_is_reported() -> Result<()> {
    let dir = TempDir::new()?;
    let session = SanitizerSession::open_dir(dir.path())?;
    let path = dir.path().join(format!("history_{}.json", session.device_id()));
    fs::write(path, "not json")?;

    let err = session.history().list().unwrap_err();
    assert!(matches!(err, SanitizerError::Persistence(_)));
    Ok(())
}
