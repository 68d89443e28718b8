//! Configuration management for `txtsan-core`.
//!
//! This module defines the core data structures for sanitization rules and
//! presets, the built-in preset set embedded at compile time, and the small
//! YAML configuration that tells the library where to persist its state.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::SanitizerError;

/// Maximum allowed length, in bytes, for a rule's find-text. Longer rules
/// (literal ones included) are skipped when applied.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "TXTSAN_DATA_DIR";

/// How a rule's find-text is interpreted.
///
/// Rules normally leave this unset and let the compiler infer the kind from
/// the text itself. Setting it pins the interpretation; `Literal` is the only
/// way to match regex metacharacters verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Matched verbatim; every metacharacter is escaped.
    Literal,
    /// `[...]`: matches any single character from the enclosed set.
    CharacterClass,
    /// Text containing `\n`, `\t` or `\r` escapes, decoded before matching.
    EscapedLiteral,
    /// A regular expression. The replacement may reference captures as `$1`
    /// or `${name}`. A reference runs as far as the longest name it can, so
    /// `$1_at` asks for a group called `1_at` and expands to nothing; write
    /// `${1}_at` instead.
    Pattern,
}

/// A single find/replace instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Rule {
    /// Lower priorities run first. Ties keep their original order.
    #[serde(default)]
    pub priority: i64,
    /// What to look for. Must be non-empty and at most
    /// [`MAX_PATTERN_LENGTH`] bytes long; otherwise the rule is skipped at
    /// apply time, whatever its kind.
    pub find: String,
    #[serde(default)]
    pub replace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RuleKind>,
}

impl Rule {
    pub fn new(priority: i64, find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            priority,
            find: find.into(),
            replace: replace.into(),
            kind: None,
        }
    }

    /// Pins the rule to an explicit kind instead of inferring it.
    pub fn with_kind(mut self, kind: RuleKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// A named, ordered set of rules.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Unique per device. Empty for presets that have not been saved yet.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// True only for the built-in presets.
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<DateTime<Utc>>,
}

impl Preset {
    /// Builds an unsaved custom preset. `PresetStore::save` assigns its id.
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            rules,
            is_default: false,
            created_at: Utc::now(),
            updated_at: None,
            imported_at: None,
        }
    }
}

/// Shape of an entry in the embedded default preset file.
#[derive(Debug, Deserialize)]
struct PresetTemplate {
    id: String,
    name: String,
    rules: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
struct DefaultPresets {
    presets: Vec<PresetTemplate>,
}

/// Builds the built-in presets from the embedded configuration.
///
/// Each call produces a fresh set stamped with the current time. Nothing is
/// persisted here.
pub fn load_default_presets() -> Result<Vec<Preset>, SanitizerError> {
    debug!("Loading default presets from embedded string...");
    let default_yaml = include_str!("../config/default_presets.yaml");
    let parsed: DefaultPresets = serde_yml::from_str(default_yaml)
        .map_err(|e| SanitizerError::Config(format!("Failed to parse default presets: {}", e)))?;

    let now = Utc::now();
    let presets: Vec<Preset> = parsed
        .presets
        .into_iter()
        .map(|template| Preset {
            id: template.id,
            name: template.name,
            rules: template.rules,
            is_default: true,
            created_at: now,
            updated_at: None,
            imported_at: None,
        })
        .collect();

    debug!("Loaded {} default presets.", presets.len());
    Ok(presets)
}

/// Library configuration, usually read from a YAML file.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Directory holding the device id, presets and history.
    pub data_dir: Option<PathBuf>,
}

impl SanitizerConfig {
    /// Loads the configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SanitizerConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Picks the data directory: explicit override, then `TXTSAN_DATA_DIR`,
    /// then this config, then the platform data dir.
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return PathBuf::from(dir);
            }
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match dirs::data_dir() {
            Some(dir) => dir.join("txtsan"),
            None => PathBuf::from(".txtsan"),
        }
    }
}
