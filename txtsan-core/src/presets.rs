//! presets.rs - CRUD over a device's preset collection.
//!
//! Until the first mutation on a device nothing is stored, and `list` keeps
//! returning a freshly computed copy of the built-in presets. The first
//! `save`, `delete` or import writes those defaults out together with the
//! change; from then on the stored collection is authoritative.
//!
//! Every mutation rewrites the whole collection and is guarded by the
//! revision read at the start of the call.
//!
//! License: MIT OR Apache-2.0

use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use crate::config::{load_default_presets, Preset};
use crate::device::{DeviceId, DeviceIdentity};
use crate::errors::{Result, SanitizerError};
use crate::ids::generate_unique_id;
use crate::storage::{read_json, write_json, KeyValueStore, Revision, StorageKey};

/// A loaded collection plus the revision it was read at (`None` when the
/// collection has never been written).
pub(crate) struct LoadedPresets {
    pub presets: Vec<Preset>,
    pub revision: Option<Revision>,
}

pub struct PresetStore {
    store: Arc<dyn KeyValueStore>,
    device_id: DeviceId,
}

impl PresetStore {
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
        StorageKey::Presets(self.device_id.as_str().to_string())
    }

    pub(crate) fn load(&self) -> Result<LoadedPresets> {
        match read_json::<Vec<Preset>>(self.store.as_ref(), &self.key())? {
            Some((presets, revision)) => Ok(LoadedPresets {
                presets,
                revision: Some(revision),
            }),
            None => {
                debug!("No presets stored for device {}; using defaults.", self.device_id);
                Ok(LoadedPresets {
                    presets: load_default_presets()?,
                    revision: None,
                })
            }
        }
    }

    pub(crate) fn persist(&self, presets: &[Preset], expected: Option<&Revision>) -> Result<()> {
        write_json(self.store.as_ref(), &self.key(), presets, expected)?;
        Ok(())
    }

    /// All presets for this device, defaults included.
    pub fn list(&self) -> Result<Vec<Preset>> {
        Ok(self.load()?.presets)
    }

    pub fn get(&self, id: &str) -> Result<Preset> {
        self.list()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| SanitizerError::preset_not_found(id))
    }

    /// Looks a preset up by exact, case-sensitive name.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Preset>> {
        Ok(self.list()?.into_iter().find(|p| p.name == name))
    }

    /// Updates the preset with the same id, or adds it as a new custom preset.
    ///
    /// Updates keep the stored `created_at`, `imported_at` and `is_default`
    /// and stamp `updated_at`. New presets get a fresh id and `created_at`
    /// and are never marked default. Returns the preset as stored.
    pub fn save(&self, preset: Preset) -> Result<Preset> {
        let LoadedPresets { mut presets, revision } = self.load()?;

        let saved = match presets.iter_mut().find(|p| !preset.id.is_empty() && p.id == preset.id) {
            Some(existing) => {
                existing.name = preset.name;
                existing.rules = preset.rules;
                existing.updated_at = Some(Utc::now());
                info!("Updated preset '{}' ({})", existing.name, existing.id);
                existing.clone()
            }
            None => {
                let id = generate_unique_id(|candidate| presets.iter().any(|p| p.id == candidate));
                let created = Preset {
                    id,
                    created_at: Utc::now(),
                    is_default: false,
                    updated_at: None,
                    ..preset
                };
                info!("Added preset '{}' ({})", created.name, created.id);
                presets.push(created.clone());
                created
            }
        };

        self.persist(&presets, revision.as_ref())?;
        Ok(saved)
    }

    /// Removes a preset. Fails with `NotFound` if no preset has that id.
    pub fn delete(&self, id: &str) -> Result<Preset> {
        let LoadedPresets { mut presets, revision } = self.load()?;
        let index = presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| SanitizerError::preset_not_found(id))?;
        let removed = presets.remove(index);
        self.persist(&presets, revision.as_ref())?;
        info!("Deleted preset '{}' ({})", removed.name, removed.id);
        Ok(removed)
    }
}
