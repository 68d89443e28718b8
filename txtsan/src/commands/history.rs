//! `txtsan history ...` - browsing and pruning history.

use anyhow::Result;

use txtsan_core::SanitizerSession;

use crate::cli::HistoryCommand;
use crate::ui::output_format::{history_table, info_msg, success_msg};

pub fn run_history(session: &SanitizerSession, command: HistoryCommand, quiet: bool) -> Result<()> {
    match command {
        HistoryCommand::List { limit, json } => {
            let mut entries = session.history().list()?;
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                if !quiet {
                    info_msg("History is empty.");
                }
            } else {
                println!("{}", history_table(&entries));
            }
        }
        HistoryCommand::Delete { id } => {
            let removed = session.history().delete_one(&id)?;
            if !quiet {
                if removed {
                    success_msg(format!("Deleted history entry {}.", id));
                } else {
                    info_msg(format!("No history entry {}; nothing deleted.", id));
                }
            }
        }
        HistoryCommand::Clear => {
            session.history().clear()?;
            if !quiet {
                success_msg("History cleared.");
            }
        }
    }
    Ok(())
}
