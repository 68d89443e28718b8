//! In-memory `KeyValueStore`, used by tests and by callers that don't want
//! anything written to disk.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{check_revision, KeyValueStore, Revision, StorageKey, Versioned};
use crate::errors::PersistenceError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<StorageKey, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(key: &StorageKey) -> PersistenceError {
    PersistenceError::Poisoned(key.to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &StorageKey) -> Result<Option<Versioned>, PersistenceError> {
        let entries = self.entries.read().map_err(|_| poisoned(key))?;
        Ok(entries.get(key).map(|bytes| Versioned::new(bytes.clone())))
    }

    fn put(
        &self,
        key: &StorageKey,
        bytes: Vec<u8>,
        expected: Option<&Revision>,
    ) -> Result<Revision, PersistenceError> {
        let mut entries = self.entries.write().map_err(|_| poisoned(key))?;
        check_revision(key, entries.get(key).map(Vec::as_slice), expected)?;
        let revision = Revision::of(&bytes);
        entries.insert(key.clone(), bytes);
        Ok(revision)
    }

    fn put_if_absent(&self, key: &StorageKey, bytes: Vec<u8>) -> Result<Vec<u8>, PersistenceError> {
        let mut entries = self.entries.write().map_err(|_| poisoned(key))?;
        Ok(entries.entry(key.clone()).or_insert(bytes).clone())
    }
}
