// txtsan/src/cli.rs
//! This file defines the command-line interface (CLI) for the txtsan
//! application, including all available commands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use txtsan_core::Rule;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "txtsan",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clean up text with reusable find/replace presets",
    long_about = "txtsan applies ordered find/replace presets to text from a file or stdin. Presets and a capped history of changed runs are stored per device in a local data directory.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to a YAML configuration file.
    #[arg(long = "config", value_name = "FILE", global = true, help = "Path to a YAML configuration file.")]
    pub config: Option<PathBuf>,

    /// Directory holding presets and history.
    #[arg(long = "data-dir", value_name = "DIR", global = true, help = "Directory holding presets and history (overrides TXTSAN_DATA_DIR and the config file).")]
    pub data_dir: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `txtsan` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Applies a preset to a file or stdin.
    Apply(ApplyCommand),

    /// Manages presets.
    #[command(subcommand)]
    Presets(PresetsCommand),

    /// Browses and prunes the history of changed runs.
    #[command(subcommand)]
    History(HistoryCommand),

    /// Prints this device's id.
    Device,
}

/// Arguments for the `apply` command.
#[derive(Args, Debug)]
pub struct ApplyCommand {
    /// Preset id or exact name.
    #[arg(long, short = 'p', value_name = "PRESET", help = "Preset id or exact name to apply.")]
    pub preset: String,

    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write sanitized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Show a unified diff instead of the sanitized text.
    #[arg(long, short = 'D', help = "Show a unified diff to highlight the changes made.")]
    pub diff: bool,

    /// Do not record this run in history.
    #[arg(long = "no-history", help = "Do not record this run in history.")]
    pub no_history: bool,
}

/// Subcommands for the `presets` command.
#[derive(Subcommand, Debug)]
pub enum PresetsCommand {
    /// Lists all presets, built-in ones included.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Shows the rules of one preset.
    Show {
        /// Preset id or exact name.
        #[arg(value_name = "PRESET")]
        preset: String,
    },
    /// Adds a custom preset.
    Add {
        #[arg(long, value_name = "NAME")]
        name: String,
        /// A rule as `PRIORITY:FIND=>REPLACE`. Repeat for more rules.
        #[arg(long = "rule", value_name = "RULE", value_parser = parse_rule_spec, required = true)]
        rules: Vec<Rule>,
        /// Match every FIND verbatim instead of inferring its kind.
        #[arg(long)]
        literal: bool,
    },
    /// Deletes a preset by id.
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Exports custom presets as JSON.
    Export {
        #[arg(long, short = 'o', value_name = "FILE", help = "Write the export to a file instead of stdout.")]
        output: Option<PathBuf>,
    },
    /// Imports presets from an export file, skipping names that already exist.
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Subcommands for the `history` command.
#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Lists history entries, newest first.
    List {
        /// Show at most N entries.
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Deletes one entry. Unknown ids are ignored.
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Deletes every entry.
    Clear,
}

/// Parses `PRIORITY:FIND=>REPLACE`. The replacement may be empty.
pub fn parse_rule_spec(spec: &str) -> Result<Rule, String> {
    let (priority, rest) = spec
        .split_once(':')
        .ok_or_else(|| format!("rule '{}' must look like PRIORITY:FIND=>REPLACE", spec))?;
    let priority: i64 = priority
        .trim()
        .parse()
        .map_err(|_| format!("rule '{}' has a non-numeric priority '{}'", spec, priority))?;
    let (find, replace) = rest
        .split_once("=>")
        .ok_or_else(|| format!("rule '{}' is missing '=>'", spec))?;
    if find.is_empty() {
        return Err(format!("rule '{}' has an empty FIND", spec));
    }
    Ok(Rule::new(priority, find, replace))
}
