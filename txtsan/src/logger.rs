// txtsan/src/logger.rs
//! Logging setup for the CLI.
//!
//! `RUST_LOG` is honoured unless a level is forced by `--quiet` or `--debug`.

use log::LevelFilter;

/// Initializes `env_logger`. Safe to call more than once; later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
