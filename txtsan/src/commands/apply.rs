//! `txtsan apply` - runs a preset over a file or stdin.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use txtsan_core::SanitizerSession;

use crate::ui::diff_viewer;
use crate::ui::output_format::{info_msg, warn_msg};

/// Options for [`run_apply`].
pub struct ApplyOptions {
    pub input: String,
    pub preset: String,
    pub output_path: Option<PathBuf>,
    pub diff: bool,
    pub record_history: bool,
    pub quiet: bool,
}

/// Reads the whole input from `path`, or from stdin when `None`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

pub fn run_apply(session: &SanitizerSession, opts: ApplyOptions) -> Result<()> {
    info!("Applying preset '{}'.", opts.preset);

    let outcome = if opts.record_history {
        session.sanitize(&opts.input, &opts.preset)
    } else {
        session.preview(&opts.input, &opts.preset)
    }
    .with_context(|| format!("Failed to apply preset '{}'", opts.preset))?;

    debug!(
        "Input length: {}, output length: {}",
        opts.input.len(),
        outcome.output().len()
    );

    for (rule, error) in outcome.report.skipped() {
        warn_msg(format!(
            "Rule {:?} (priority {}) was skipped: {}",
            rule.find, rule.priority, error
        ));
    }

    match &opts.output_path {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            if opts.diff {
                diff_viewer::print_diff(&opts.input, outcome.output(), &mut file, false)?;
            } else {
                file.write_all(outcome.output().as_bytes())?;
            }
            if !opts.quiet {
                info_msg(format!("Wrote sanitized content to {}", path.display()));
            }
        }
        None => {
            let stdout = io::stdout();
            let supports_color = stdout.is_terminal();
            let mut writer = stdout.lock();
            if opts.diff {
                diff_viewer::print_diff(&opts.input, outcome.output(), &mut writer, supports_color)?;
            } else {
                writer.write_all(outcome.output().as_bytes())?;
                writer.flush()?;
            }
        }
    }

    if !opts.quiet {
        let mut summary = format!(
            "Preset '{}': {} replacement(s).",
            outcome.preset.name,
            outcome.report.total_replacements()
        );
        if let Some(entry) = &outcome.recorded {
            summary.push_str(&format!(" Recorded in history as {}.", entry.id));
        }
        info_msg(summary);
    }
    Ok(())
}
