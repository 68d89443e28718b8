//! `txtsan presets ...` - preset management.

use anyhow::{Context, Result};
use log::info;
use std::fs;

use txtsan_core::{Preset, RuleKind, SanitizerSession};

use crate::cli::PresetsCommand;
use crate::ui::output_format::{presets_table, rules_table, success_msg};

pub fn run_presets(session: &SanitizerSession, command: PresetsCommand, quiet: bool) -> Result<()> {
    match command {
        PresetsCommand::List { json } => {
            let presets = session.presets().list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            } else {
                println!("{}", presets_table(&presets));
            }
        }
        PresetsCommand::Show { preset } => {
            let preset = session.resolve_preset(&preset)?;
            println!("{} ({})", preset.name, preset.id);
            println!("{}", rules_table(&preset));
        }
        PresetsCommand::Add { name, rules, literal } => {
            let rules = if literal {
                rules.into_iter().map(|r| r.with_kind(RuleKind::Literal)).collect::<Vec<_>>()
            } else {
                rules
            };
            let saved = session.presets().save(Preset::new(name, rules))?;
            if !quiet {
                success_msg(format!("Saved preset '{}' with id {}.", saved.name, saved.id));
            }
            println!("{}", saved.id);
        }
        PresetsCommand::Delete { id } => {
            let removed = session.presets().delete(&id)?;
            if !quiet {
                success_msg(format!("Deleted preset '{}'.", removed.name));
            }
        }
        PresetsCommand::Export { output } => {
            let json = session.codec().export_json()?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
                    info!("Exported presets to {}", path.display());
                    if !quiet {
                        success_msg(format!("Exported presets to {}.", path.display()));
                    }
                }
                None => println!("{}", json),
            }
        }
        PresetsCommand::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file: {}", file.display()))?;
            let summary = session.codec().import_json(&text)?;
            if !quiet {
                success_msg(format!(
                    "Successfully imported {} presets. {} presets were skipped (already exist).",
                    summary.imported_count, summary.skipped_count
                ));
            }
        }
    }
    Ok(())
}
