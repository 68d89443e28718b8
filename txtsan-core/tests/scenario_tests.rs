// txtsan-core/tests/scenario_tests.rs
//! End-to-end scenarios over the public API, one per documented behavior.

use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use test_log::test;

use txtsan_core::{
    DeviceIdentity, HistoryStore, ImportExportCodec, MemoryStore, NewHistoryEntry, Preset,
    PresetStore, Rule, RuleEngine, SanitizationEngine, SanitizerError, HISTORY_CAPACITY,
};

fn identity() -> DeviceIdentity {
    DeviceIdentity::new(Arc::new(MemoryStore::new()))
}

#[test]
fn space_removal_rule() {
    let rules = vec![Rule::new(1, " ", "")];
    assert_eq!(RuleEngine::new().apply("a b  c", &rules), "abc");
}

#[test]
fn character_class_rule() {
    let rules = vec![Rule::new(1, "[!@#]", "")];
    assert_eq!(RuleEngine::new().apply("hi!@#there", &rules), "hithere");
}

#[test]
fn escaped_newline_rule() {
    let rules = vec![Rule::new(1, "\\n", " ")];
    assert_eq!(RuleEngine::new().apply("first line\nsecond line", &rules), "first line second line");
}

#[test]
fn broken_rule_does_not_affect_neighbours() {
    let engine = RuleEngine::new();
    let good = vec![Rule::new(1, "a", "b"), Rule::new(3, "c", "d")];
    let with_broken = vec![Rule::new(1, "a", "b"), Rule::new(2, "([", "!"), Rule::new(3, "c", "d")];
    assert_eq!(engine.apply("abc", &good), engine.apply("abc", &with_broken));
}

#[test]
fn history_keeps_latest_hundred() -> Result<()> {
    let history = HistoryStore::new(&identity())?;
    for n in 1..=101 {
        history.record(NewHistoryEntry {
            input_text: format!("input {}", n),
            output_text: format!("output {}", n),
            preset_name: "Standard".to_string(),
            preset_id: "std01".to_string(),
        })?;
    }
    let listed = history.list()?;
    assert_eq!(listed.len(), HISTORY_CAPACITY);
    assert_eq!(listed[0].input_text, "input 101");
    Ok(())
}

#[test]
fn import_skips_existing_names() -> Result<()> {
    let presets = PresetStore::new(&identity())?;
    let before = presets.find_by_name("Standard")?.expect("default preset");

    let summary = ImportExportCodec::new(&presets).import(&json!({
        "exportedAt": "2025-06-01T12:00:00Z",
        "deviceId": "another-device",
        "presets": [
            {"id": "aaaaa", "name": "Standard", "rules": [{"priority": 1, "find": "x", "replace": ""}]},
            {"id": "bbbbb", "name": "Custom1", "rules": [{"priority": 1, "find": "y", "replace": "z"}]}
        ]
    }))?;
    assert_eq!(summary.imported_count, 1);
    assert_eq!(summary.skipped_count, 1);

    let after = presets.find_by_name("Standard")?.expect("still there");
    assert_eq!(after.id, before.id);
    assert_eq!(after.rules, before.rules);
    assert!(presets.find_by_name("Custom1")?.is_some());
    Ok(())
}

#[test]
fn import_then_export_reproduces_custom_presets() -> Result<()> {
    let source = PresetStore::new(&identity())?;
    source.save(Preset::new("Tidy", vec![Rule::new(1, " {2,}", " "), Rule::new(2, "\\t", "")]))?;
    source.save(Preset::new("Shout", vec![Rule::new(1, "!", "!!")]))?;
    let exported = ImportExportCodec::new(&source).export_json()?;

    let target = PresetStore::new(&identity())?;
    let codec = ImportExportCodec::new(&target);
    let summary = codec.import_json(&exported)?;
    assert_eq!(summary.imported_count, 2);
    assert_eq!(summary.skipped_count, 0);

    let original = ImportExportCodec::new(&source).export()?;
    let reexported = codec.export()?;
    let shape = |presets: &[Preset]| -> Vec<(String, Vec<Rule>)> {
        presets.iter().map(|p| (p.name.clone(), p.rules.clone())).collect()
    };
    assert_eq!(shape(&original.presets), shape(&reexported.presets));
    Ok(())
}

#[test]
fn delete_semantics_differ_between_stores() -> Result<()> {
    let identity = identity();
    let presets = PresetStore::new(&identity)?;
    let history = HistoryStore::new(&identity)?;

    assert!(matches!(presets.delete("ghost"), Err(SanitizerError::NotFound { .. })));
    assert!(!history.delete_one("ghost")?);
    Ok(())
}
