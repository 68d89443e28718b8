//! errors.rs - Custom error types for the txtsan-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! Pattern failures are the odd one out: the rule engine absorbs them and
//! reports them per rule, so they never reach a caller of `apply`.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = SanitizerError> = std::result::Result<T, E>;

/// This enum represents all possible error types in the `txtsan-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SanitizerError {
    /// A malformed import envelope.
    #[error("Invalid preset file format: {0}")]
    InvalidFormat(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SanitizerError {
    pub(crate) fn preset_not_found(id: &str) -> Self {
        SanitizerError::NotFound { kind: "Preset", id: id.to_string() }
    }
}

/// Failures of the underlying key-value storage.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("Storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored data for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Stored value for '{key}' is malformed: {reason}")]
    Malformed { key: String, reason: String },

    #[error("Failed to serialize data for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Another writer changed the value between our read and our write.
    #[error("Concurrent modification detected for '{key}'; reload and try again")]
    Conflict { key: String },

    #[error("Storage lock poisoned for '{0}'")]
    Poisoned(String),
}

/// A single rule's find-text could not be turned into a matcher.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PatternError {
    #[error("find text is empty")]
    Empty,

    #[error("pattern length ({0}) exceeds maximum allowed ({1})")]
    TooLong(usize, usize),

    #[error("failed to compile pattern '{pattern}': {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
