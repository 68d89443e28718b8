// File: txtsan-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for using the core in non-interactive mode.
//!
//! [`SanitizerSession`] wires the stores and the engine together the way a
//! front end would: pick a preset, apply it, and record the run in history
//! when it actually changed something.

use log::debug;
use std::path::Path;
use std::sync::Arc;

use crate::codec::ImportExportCodec;
use crate::config::{Preset, Rule};
use crate::device::{DeviceId, DeviceIdentity};
use crate::engine::{SanitizationEngine, SanitizeReport};
use crate::engines::rule_engine::RuleEngine;
use crate::errors::{Result, SanitizerError};
use crate::history::{is_noteworthy, HistoryEntry, HistoryStore, NewHistoryEntry};
use crate::presets::PresetStore;
use crate::storage::{FileStore, KeyValueStore};

/// Applies `rules` to `content` in a single stateless call.
pub fn headless_sanitize_string(content: &str, rules: &[Rule]) -> String {
    RuleEngine::new().apply(content, rules)
}

/// The result of running a preset through a session.
#[derive(Debug)]
pub struct SanitizeOutcome {
    pub preset: Preset,
    pub report: SanitizeReport,
    /// The history entry written for this run, if any.
    pub recorded: Option<HistoryEntry>,
}

impl SanitizeOutcome {
    pub fn output(&self) -> &str {
        &self.report.output
    }

    pub fn changed(&self) -> bool {
        self.report.changed
    }
}

pub struct SanitizerSession {
    identity: DeviceIdentity,
    presets: PresetStore,
    history: HistoryStore,
    engine: Box<dyn SanitizationEngine>,
}

impl SanitizerSession {
    /// Opens a session over `store`, creating the device id if needed.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let identity = DeviceIdentity::new(store);
        let presets = PresetStore::new(&identity)?;
        let history = HistoryStore::new(&identity)?;
        debug!("Opened session for device {}", presets.device_id());
        Ok(Self {
            identity,
            presets,
            history,
            engine: Box::new(RuleEngine::new()),
        })
    }

    /// Opens a session persisted under `dir`.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let store = FileStore::open(dir.as_ref())?;
        Self::open(Arc::new(store))
    }

    /// Swaps the engine used by [`SanitizerSession::sanitize`].
    pub fn with_engine(mut self, engine: Box<dyn SanitizationEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn device_id(&self) -> &DeviceId {
        self.presets.device_id()
    }

    pub fn presets(&self) -> &PresetStore {
        &self.presets
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn codec(&self) -> ImportExportCodec<'_> {
        ImportExportCodec::new(&self.presets)
    }

    /// Finds a preset by id, falling back to an exact name match.
    pub fn resolve_preset(&self, id_or_name: &str) -> Result<Preset> {
        let presets = self.presets.list()?;
        presets
            .iter()
            .find(|p| p.id == id_or_name)
            .or_else(|| presets.iter().find(|p| p.name == id_or_name))
            .cloned()
            .ok_or_else(|| SanitizerError::preset_not_found(id_or_name))
    }

    /// Applies a preset without touching history.
    pub fn preview(&self, content: &str, preset_ref: &str) -> Result<SanitizeOutcome> {
        let preset = self.resolve_preset(preset_ref)?;
        let report = self.engine.apply_with_report(content, &preset.rules);
        Ok(SanitizeOutcome {
            preset,
            report,
            recorded: None,
        })
    }

    /// Applies a preset and records the run when it is noteworthy.
    pub fn sanitize(&self, content: &str, preset_ref: &str) -> Result<SanitizeOutcome> {
        let mut outcome = self.preview(content, preset_ref)?;
        if is_noteworthy(content, outcome.output()) {
            let entry = self.history.record(NewHistoryEntry {
                input_text: content.to_string(),
                output_text: outcome.output().to_string(),
                preset_name: outcome.preset.name.clone(),
                preset_id: outcome.preset.id.clone(),
            })?;
            outcome.recorded = Some(entry);
        } else {
            debug!("Run with preset '{}' not recorded: nothing changed or blank input.", outcome.preset.name);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{RuleOutcome, RuleReport};
    use crate::storage::MemoryStore;

    /// Ignores the rules and upper-cases the text.
    struct ShoutingEngine;

    impl SanitizationEngine for ShoutingEngine {
        fn apply_with_report(&self, text: &str, rules: &[Rule]) -> SanitizeReport {
            let output = text.to_uppercase();
            SanitizeReport {
                changed: output != text,
                output,
                rules: rules
                    .iter()
                    .map(|rule| RuleReport {
                        rule: rule.clone(),
                        outcome: RuleOutcome::Applied { replacements: 0 },
                    })
                    .collect(),
            }
        }
    }

    fn session() -> SanitizerSession {
        SanitizerSession::open(Arc::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn headless_string_applies_rules() {
        let rules = vec![Rule::new(1, "[!@#]", "")];
        assert_eq!(headless_sanitize_string("hi!@#there", &rules), "hithere");
    }

    #[test]
    fn sanitize_records_only_noteworthy_runs() {
        let session = session();

        let changed = session.sanitize("a b  c", "No Spaces").unwrap();
        assert_eq!(changed.output(), "abc");
        let recorded = changed.recorded.unwrap();
        assert_eq!(recorded.preset_name, "No Spaces");
        assert_eq!(recorded.output_text, "abc");

        let unchanged = session.sanitize("abc", "No Spaces").unwrap();
        assert!(!unchanged.changed());
        assert!(unchanged.recorded.is_none());

        let blank = session.sanitize("   ", "No Spaces").unwrap();
        assert!(blank.changed());
        assert!(blank.recorded.is_none());

        assert_eq!(session.history().list().unwrap().len(), 1);
    }

    #[test]
    fn custom_engine_drives_sanitize_and_history() {
        let session = session().with_engine(Box::new(ShoutingEngine));
        let outcome = session.sanitize("quiet", "Standard").unwrap();
        assert_eq!(outcome.output(), "QUIET");
        assert_eq!(outcome.recorded.unwrap().output_text, "QUIET");
    }

    #[test]
    fn identity_matches_session_device() {
        let session = session();
        assert_eq!(&session.identity().get_or_create().unwrap(), session.device_id());
    }

    #[test]
    fn preview_never_records() {
        let session = session();
        let outcome = session.preview("a b", "No Spaces").unwrap();
        assert_eq!(outcome.output(), "ab");
        assert!(session.history().list().unwrap().is_empty());
    }

    #[test]
    fn resolves_by_id_then_name() {
        let session = session();
        assert_eq!(session.resolve_preset("std01").unwrap().name, "Standard");
        assert_eq!(session.resolve_preset("Standard").unwrap().id, "std01");
        assert!(matches!(
            session.resolve_preset("missing"),
            Err(SanitizerError::NotFound { .. })
        ));
    }

    #[test]
    fn standard_preset_normalizes_whitespace() {
        let session = session();
        let outcome = session.preview("  hello\t\tworld   again  ", "Standard").unwrap();
        assert_eq!(outcome.output(), "hello world again");
    }

    #[test]
    fn single_line_preset_joins_lines() {
        let session = session();
        let outcome = session.preview("one\r\ntwo\nthree", "Single Line").unwrap();
        assert_eq!(outcome.output(), "one two three");
    }
}
