//! device.rs - The per-device identifier that namespaces all persisted state.
//!
//! The id is a random UUID created the first time it is asked for and
//! persisted verbatim under the `device_id` key. Creation goes through the
//! store's atomic put-if-absent, so two first calls racing each other agree
//! on a single id instead of splitting storage between two.
//!
//! License: MIT OR APACHE 2.0

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{PersistenceError, Result};
use crate::storage::{KeyValueStore, StorageKey};

/// Identifier of one storage origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out the device id, creating it on first use.
#[derive(Clone)]
pub struct DeviceIdentity {
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceIdentity").finish_non_exhaustive()
    }
}

impl DeviceIdentity {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The store this identity (and everything namespaced by it) lives in.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// Returns the persisted id, generating and persisting one if absent.
    pub fn get_or_create(&self) -> Result<DeviceId> {
        let key = StorageKey::DeviceId;
        if let Some(existing) = self.store.get(&key)? {
            return parse_id(&key, &existing.bytes);
        }

        let candidate = Uuid::new_v4().to_string();
        let stored = self.store.put_if_absent(&key, candidate.clone().into_bytes())?;
        let id = parse_id(&key, &stored)?;
        if id.as_str() == candidate {
            info!("Created new device id {}", id);
        }
        Ok(id)
    }
}

fn parse_id(key: &StorageKey, bytes: &[u8]) -> Result<DeviceId> {
    let text = std::str::from_utf8(bytes).map_err(|e| PersistenceError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PersistenceError::Malformed {
            key: key.to_string(),
            reason: "device id is empty".to_string(),
        }
        .into());
    }
    Ok(DeviceId(trimmed.to_string()))
}
