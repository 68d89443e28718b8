//! codec.rs - Moves custom presets between devices as JSON.
//!
//! Exports carry only custom presets. Imports merge by name: a preset whose
//! name already exists on this device (exact, case-sensitive) is skipped,
//! everything else is added under a fresh id. Incoming ids are never kept.
//!
//! License: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Preset;
use crate::errors::{PersistenceError, Result, SanitizerError};
use crate::ids::generate_unique_id;
use crate::presets::{LoadedPresets, PresetStore};

/// The JSON document produced by an export.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub exported_at: DateTime<Utc>,
    pub device_id: String,
    pub presets: Vec<Preset>,
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported_count: usize,
    pub skipped_count: usize,
}

pub struct ImportExportCodec<'a> {
    presets: &'a PresetStore,
}

impl<'a> ImportExportCodec<'a> {
    pub fn new(presets: &'a PresetStore) -> Self {
        Self { presets }
    }

    /// Builds an envelope holding every non-default preset.
    pub fn export(&self) -> Result<ExportEnvelope> {
        let custom: Vec<Preset> = self
            .presets
            .list()?
            .into_iter()
            .filter(|p| !p.is_default)
            .collect();
        debug!("Exporting {} custom presets.", custom.len());
        Ok(ExportEnvelope {
            exported_at: Utc::now(),
            device_id: self.presets.device_id().to_string(),
            presets: custom,
        })
    }

    /// Same as [`ImportExportCodec::export`], rendered as pretty JSON.
    pub fn export_json(&self) -> Result<String> {
        let envelope = self.export()?;
        serde_json::to_string_pretty(&envelope).map_err(|source| {
            PersistenceError::Serialize { key: "export".to_string(), source }.into()
        })
    }

    /// Parses `json` and imports it. Text that isn't JSON is an invalid format.
    pub fn import_json(&self, json: &str) -> Result<ImportSummary> {
        let envelope: Value = serde_json::from_str(json)
            .map_err(|e| SanitizerError::InvalidFormat(format!("not valid JSON: {}", e)))?;
        self.import(&envelope)
    }

    /// Merges the presets of an envelope into this device's collection.
    ///
    /// The envelope must have a `presets` array whose elements all parse as
    /// presets; otherwise nothing is changed. The merged collection is
    /// written once at the end.
    pub fn import(&self, envelope: &Value) -> Result<ImportSummary> {
        let items = envelope
            .get("presets")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SanitizerError::InvalidFormat("'presets' is missing or not an array".to_string())
            })?;

        let incoming = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Preset>(item.clone()).map_err(|e| {
                    SanitizerError::InvalidFormat(format!("preset #{}: {}", index + 1, e))
                })
            })
            .collect::<Result<Vec<Preset>>>()?;

        let LoadedPresets { mut presets, revision } = self.presets.load()?;
        let mut summary = ImportSummary::default();

        for preset in incoming {
            if presets.iter().any(|p| p.name == preset.name) {
                debug!("Skipping imported preset '{}': name already exists.", preset.name);
                summary.skipped_count += 1;
                continue;
            }
            let id = generate_unique_id(|candidate| presets.iter().any(|p| p.id == candidate));
            presets.push(Preset {
                id,
                imported_at: Some(Utc::now()),
                is_default: false,
                ..preset
            });
            summary.imported_count += 1;
        }

        self.presets.persist(&presets, revision.as_ref())?;
        info!(
            "Imported {} presets, skipped {} (already exist).",
            summary.imported_count, summary.skipped_count
        );
        Ok(summary)
    }
}
