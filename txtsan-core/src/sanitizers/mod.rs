//! Pattern compilation for txtsan rules.
//!
//! This module turns stored rules into compiled regular expressions. The rule
//! engine (`engines::rule_engine`) drives it one rule at a time so that a rule
//! which fails to compile can be skipped without affecting the others.

pub mod compiler;
