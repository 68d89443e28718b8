//! history.rs - Capacity-bounded, newest-first log of transformations.
//!
//! The store records whatever it is given. Deciding whether a run deserves
//! an entry is the caller's job; [`is_noteworthy`] implements the usual
//! policy.
//!
//! License: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::device::{DeviceId, DeviceIdentity};
use crate::errors::Result;
use crate::ids::generate_unique_id;
use crate::storage::{read_json, write_json, KeyValueStore, Revision, StorageKey};

/// Maximum number of entries kept per device.
pub const HISTORY_CAPACITY: usize = 100;

/// One recorded transformation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub input_text: String,
    pub output_text: String,
    pub preset_name: String,
    pub preset_id: String,
}

/// The caller-supplied part of a history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub input_text: String,
    pub output_text: String,
    pub preset_name: String,
    pub preset_id: String,
}

/// True when a run changed the text and the input was not blank.
pub fn is_noteworthy(input: &str, output: &str) -> bool {
    output != input && !input.trim().is_empty()
}

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    device_id: DeviceId,
}

impl HistoryStore {
    /// Resolves the device id and binds the store to its namespace.
    pub fn new(identity: &DeviceIdentity) -> Result<Self> {
        Ok(Self {
            store: identity.store(),
            device_id: identity.get_or_create()?,
        })
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    fn key(&self) -> StorageKey {
        StorageKey::History(self.device_id.as_str().to_string())
    }

    /// Stored entries, newest first, plus the revision they were read at.
    fn load(&self) -> Result<(Vec<HistoryEntry>, Option<Revision>)> {
        let (mut entries, revision) = match read_json::<Vec<HistoryEntry>>(self.store.as_ref(), &self.key())? {
            Some((entries, revision)) => (entries, Some(revision)),
            None => (Vec::new(), None),
        };
        // Stable, so entries sharing a timestamp keep their stored order.
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok((entries, revision))
    }

    /// Stamps a new entry, puts it at the head and drops anything past
    /// [`HISTORY_CAPACITY`].
    pub fn record(&self, entry: NewHistoryEntry) -> Result<HistoryEntry> {
        let (mut entries, revision) = self.load()?;

        let id = generate_unique_id(|candidate| entries.iter().any(|e| e.id == candidate));
        let stored = HistoryEntry {
            id,
            timestamp: Utc::now(),
            input_text: entry.input_text,
            output_text: entry.output_text,
            preset_name: entry.preset_name,
            preset_id: entry.preset_id,
        };

        entries.insert(0, stored.clone());
        if entries.len() > HISTORY_CAPACITY {
            debug!("History over capacity; dropping {} oldest.", entries.len() - HISTORY_CAPACITY);
            entries.truncate(HISTORY_CAPACITY);
        }

        write_json(self.store.as_ref(), &self.key(), &entries, revision.as_ref())?;
        debug!("Recorded history entry {} ({})", stored.id, stored.preset_name);
        Ok(stored)
    }

    /// All entries, newest first.
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.load()?.0)
    }

    /// Removes the entry with `id`. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn delete_one(&self, id: &str) -> Result<bool> {
        let (mut entries, revision) = self.load()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            debug!("History entry {} not found; nothing to delete.", id);
            return Ok(false);
        }
        write_json(self.store.as_ref(), &self.key(), &entries, revision.as_ref())?;
        info!("Deleted history entry {}", id);
        Ok(true)
    }

    /// Empties the history.
    pub fn clear(&self) -> Result<()> {
        let revision = self.store.get(&self.key())?.map(|v| v.revision);
        write_json(self.store.as_ref(), &self.key(), &Vec::<HistoryEntry>::new(), revision.as_ref())?;
        info!("Cleared history for device {}", self.device_id);
        Ok(())
    }
}
