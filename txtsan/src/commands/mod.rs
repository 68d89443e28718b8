// txtsan/src/commands/mod.rs
//! Implementations of the CLI subcommands.

pub mod apply;
pub mod history;
pub mod presets;
