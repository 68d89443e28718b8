// txtsan-core/src/lib.rs
//! # txtsan Core Library
//!
//! `txtsan-core` holds everything needed to clean up text with reusable
//! find/replace presets: the rule model, a pattern compiler, an engine that
//! applies rules in priority order while isolating failing rules, and a
//! small persistence layer that keeps presets and a capped history per
//! device.
//!
//! ## Modules
//!
//! * `config`: `Rule`, `Preset`, the embedded default presets and `SanitizerConfig`.
//! * `sanitizers`: Turns a rule's find-text into a compiled matcher.
//! * `engine`: The `SanitizationEngine` trait and its per-rule report.
//! * `engines`: Concrete engines (`RuleEngine`).
//! * `storage`: The `KeyValueStore` abstraction with memory and file backends.
//! * `device`: The per-device id that namespaces stored state.
//! * `presets`: CRUD over a device's presets.
//! * `history`: The newest-first, capacity-bounded history log.
//! * `codec`: Import/export of custom presets as JSON.
//! * `headless`: `SanitizerSession`, wiring all of the above together.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use txtsan_core::{MemoryStore, SanitizerSession};
//!
//! fn main() -> Result<(), txtsan_core::SanitizerError> {
//!     let session = SanitizerSession::open(Arc::new(MemoryStore::new()))?;
//!
//!     let outcome = session.sanitize("a b  c", "No Spaces")?;
//!     assert_eq!(outcome.output(), "abc");
//!     assert!(outcome.recorded.is_some());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`SanitizerError`]. A rule whose pattern does
//! not compile never fails a run; it is skipped and reported in
//! [`SanitizeReport`].
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod codec;
pub mod config;
pub mod device;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod history;
pub mod ids;
pub mod presets;
pub mod sanitizers;
pub mod storage;

/// Re-exports the rule and preset model plus configuration helpers.
pub use config::{
    load_default_presets,
    Preset,
    Rule,
    RuleKind,
    SanitizerConfig,
    DATA_DIR_ENV,
    MAX_PATTERN_LENGTH,
};

/// Re-exports the error types.
pub use errors::{PatternError, PersistenceError, SanitizerError};

/// Re-exports the engine trait, its report, and the concrete engine.
pub use engine::{RuleOutcome, RuleReport, SanitizationEngine, SanitizeReport};
pub use engines::rule_engine::RuleEngine;

/// Re-exports the pattern compiler for callers that want to validate rules up front.
pub use sanitizers::compiler::{classify, compile_rule, CompiledRule};

/// Re-exports persistence.
pub use storage::{FileStore, KeyValueStore, MemoryStore, Revision, StorageKey};
pub use device::{DeviceId, DeviceIdentity};
pub use presets::PresetStore;
pub use history::{is_noteworthy, HistoryEntry, HistoryStore, NewHistoryEntry, HISTORY_CAPACITY};
pub use codec::{ExportEnvelope, ImportExportCodec, ImportSummary};

/// Re-exports types and functions for one-shot, non-interactive use.
pub use headless::{headless_sanitize_string, SanitizeOutcome, SanitizerSession};
