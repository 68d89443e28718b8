// txtsan/src/ui/output_format.rs
//! Colored status messages on stderr and tables on stdout.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::io::{self, Write};

use txtsan_core::{HistoryEntry, Preset};

/// Longest text preview shown in a history table cell.
const PREVIEW_CHARS: usize = 40;

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{}", msg.cyan())
    } else {
        writeln!(writer, "{}", msg)
    }
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", "Warning:".yellow().bold(), msg)
    } else {
        writeln!(writer, "Warning: {}", msg)
    }
}

pub fn print_success_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{}", msg.green())
    } else {
        writeln!(writer, "{}", msg)
    }
}

/// Prints an info message to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let color = io::stderr().is_terminal();
    let _ = print_info_message(&mut io::stderr(), msg.as_ref(), color);
}

/// Prints a warning to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let color = io::stderr().is_terminal();
    let _ = print_warn_message(&mut io::stderr(), msg.as_ref(), color);
}

/// Prints a success message to stderr.
pub fn success_msg(msg: impl AsRef<str>) {
    let color = io::stderr().is_terminal();
    let _ = print_success_message(&mut io::stderr(), msg.as_ref(), color);
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// One-line preview of possibly multi-line text.
pub fn preview(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", cut)
    } else {
        flat
    }
}

pub fn presets_table(presets: &[Preset]) -> Table {
    let mut table = new_table(vec!["ID", "Name", "Rules", "Default", "Created"]);
    for preset in presets {
        table.add_row(vec![
            preset.id.clone(),
            preset.name.clone(),
            preset.rules.len().to_string(),
            if preset.is_default { "yes".to_string() } else { String::new() },
            preset.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table
}

pub fn rules_table(preset: &Preset) -> Table {
    let mut table = new_table(vec!["Priority", "Find", "Replace", "Kind"]);
    for rule in &preset.rules {
        table.add_row(vec![
            rule.priority.to_string(),
            format!("{:?}", rule.find),
            format!("{:?}", rule.replace),
            rule.kind.map(|k| format!("{:?}", k)).unwrap_or_else(|| "auto".to_string()),
        ]);
    }
    table
}

pub fn history_table(entries: &[HistoryEntry]) -> Table {
    let mut table = new_table(vec!["ID", "When", "Preset", "Input", "Output"]);
    for entry in entries {
        table.add_row(vec![
            entry.id.clone(),
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.preset_name.clone(),
            preview(&entry.input_text),
            preview(&entry.output_text),
        ]);
    }
    table
}
