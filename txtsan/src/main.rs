// txtsan/src/main.rs
//! txtsan entry point.
//!
//! Parses arguments, sets up logging, opens the per-device session and
//! dispatches to the subcommand.

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use txtsan::cli::{Cli, Commands};
use txtsan::commands::apply::{read_input, run_apply, ApplyOptions};
use txtsan::commands::history::run_history;
use txtsan::commands::presets::run_presets;
use txtsan::logger;
use txtsan_core::{SanitizerConfig, SanitizerSession};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        logger::init_logger(Some(LevelFilter::Off));
    } else if cli.debug {
        logger::init_logger(Some(LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    let config = match &cli.config {
        Some(path) => SanitizerConfig::load_from_file(path)?,
        None => SanitizerConfig::default(),
    };
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref());
    log::debug!("Using data directory {}", data_dir.display());

    let session = SanitizerSession::open_dir(&data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;

    match cli.command {
        Commands::Apply(cmd) => {
            let input = read_input(cmd.input_file.as_deref())?;
            run_apply(
                &session,
                ApplyOptions {
                    input,
                    preset: cmd.preset,
                    output_path: cmd.output,
                    diff: cmd.diff,
                    record_history: !cmd.no_history,
                    quiet: cli.quiet,
                },
            )?;
        }
        Commands::Presets(cmd) => run_presets(&session, cmd, cli.quiet)?,
        Commands::History(cmd) => run_history(&session, cmd, cli.quiet)?,
        Commands::Device => println!("{}", session.device_id()),
    }

    Ok(())
}
