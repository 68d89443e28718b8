// txtsan/src/lib.rs
//! # txtsan CLI Application
//!
//! This crate provides the command-line front end for `txtsan-core`: apply a
//! preset to a file or stdin, manage presets, and browse history.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
