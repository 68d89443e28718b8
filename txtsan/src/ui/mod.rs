// txtsan/src/ui/mod.rs
//! Terminal output helpers: status messages, tables and diffs.

pub mod diff_viewer;
pub mod output_format;
