//! storage - Keyed persistence for device ids, presets and history.
//!
//! Every value is stored whole under a [`StorageKey`] and carries a
//! [`Revision`] (the SHA-256 of its bytes). Writers pass back the revision
//! they read; if someone else wrote in between, the write fails with
//! [`PersistenceError::Conflict`] instead of silently discarding their change.
//!
//! License: MIT OR APACHE 2.0

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::PersistenceError;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Addresses one persisted value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// The device id of this storage origin.
    DeviceId,
    /// The preset collection of a device.
    Presets(String),
    /// The history collection of a device.
    History(String),
}

impl StorageKey {
    /// File name used by [`FileStore`].
    ///
    /// Device ids are restricted to ASCII alphanumerics and `-` so a
    /// tampered id cannot escape the storage directory.
    pub fn file_name(&self) -> String {
        match self {
            StorageKey::DeviceId => "device_id".to_string(),
            StorageKey::Presets(device) => format!("presets_{}.json", path_safe(device)),
            StorageKey::History(device) => format!("history_{}.json", path_safe(device)),
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKey::DeviceId => write!(f, "device_id"),
            StorageKey::Presets(device) => write!(f, "presets/{}", device),
            StorageKey::History(device) => write!(f, "history/{}", device),
        }
    }
}

fn path_safe(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Version token of a stored value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn of(bytes: &[u8]) -> Self {
        Revision(hex::encode(Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored value together with its revision.
#[derive(Debug, Clone)]
pub struct Versioned {
    pub bytes: Vec<u8>,
    pub revision: Revision,
}

impl Versioned {
    pub fn new(bytes: Vec<u8>) -> Self {
        let revision = Revision::of(&bytes);
        Self { bytes, revision }
    }
}

/// A keyed byte store with compare-and-swap writes.
pub trait KeyValueStore: Send + Sync {
    /// Reads a value, or `None` when the key has never been written.
    fn get(&self, key: &StorageKey) -> Result<Option<Versioned>, PersistenceError>;

    /// Writes `bytes` if the current revision equals `expected`.
    ///
    /// `expected = None` requires the key to be absent.
    fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        expected: Option<&Revision>,
    ) -> Result<Revision, PersistenceError>;

    /// Atomically writes `bytes` unless the key already exists, and returns
    /// whatever is stored afterwards.
    fn put_if_absent(&self, key: &StorageKey, bytes: Vec<u8>) -> Result<Vec<u8>, PersistenceError>;
}

/// Checks a compare-and-swap precondition against the current value.
pub(crate) fn check_revision(
    key: &StorageKey,
    current: Option<&[u8]>,
    expected: Option<&Revision>,
) -> Result<(), PersistenceError> {
    let current = current.map(Revision::of);
    if current.as_ref() == expected {
        Ok(())
    } else {
        Err(PersistenceError::Conflict { key: key.to_string() })
    }
}

/// Reads and deserializes a JSON value.
pub(crate) fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &StorageKey,
) -> Result<Option<(T, Revision)>, PersistenceError> {
    match store.get(key)? {
        Some(versioned) => {
            let value = serde_json::from_slice(&versioned.bytes).map_err(|source| {
                PersistenceError::Corrupt { key: key.to_string(), source }
            })?;
            Ok(Some((value, versioned.revision)))
        }
        None => Ok(None),
    }
}

/// Serializes and writes a JSON value with a compare-and-swap check.
pub(crate) fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &StorageKey,
    value: &T,
    expected: Option<&Revision>,
) -> Result<Revision, PersistenceError> {
    let bytes = serde_json::to_vec(value).map_err(|source| PersistenceError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.put(key, bytes, expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_and_map_to_safe_file_names() {
        let key = StorageKey::Presets("ab-12".to_string());
        assert_eq!(key.to_string(), "presets/ab-12");
        assert_eq!(key.file_name(), "presets_ab-12.json");

        let hostile = StorageKey::History("../../etc".to_string());
        assert_eq!(hostile.file_name(), "history_etc.json");
    }

    #[test]
    fn revision_tracks_content() {
        assert_eq!(Revision::of(b"[]"), Revision::of(b"[]"));
        assert_ne!(Revision::of(b"[]"), Revision::of(b"[1]"));
        assert_eq!(Revision::of(b"").as_str().len(), 64);
    }

    #[test]
    fn check_revision_accepts_only_matching_state() {
        let key = StorageKey::DeviceId;
        assert!(check_revision(&key, None, None).is_ok());
        let rev = Revision::of(b"x");
        assert!(check_revision(&key, Some(&b"x"[..]), Some(&rev)).is_ok());
        assert!(check_revision(&key, Some(&b"y"[..]), Some(&rev)).is_err());
        assert!(check_revision(&key, None, Some(&rev)).is_err());
        assert!(check_revision(&key, Some(&b"x"[..]), None).is_err());
    }
}
