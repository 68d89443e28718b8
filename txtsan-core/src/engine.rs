// txtsan-core/src/engine.rs
//! Defines the core SanitizationEngine trait and the report it produces.
//!
//! The trait decouples callers (the headless session, the CLI) from the
//! concrete way rules are applied. An engine is a pure function of its
//! inputs: it owns no persisted state and keeps nothing between calls.
//!
//! License: MIT OR APACHE 2.0

use crate::config::Rule;
use crate::errors::PatternError;

/// A trait that defines the core functionality of a sanitization engine.
pub trait SanitizationEngine: Send + Sync {
    /// Applies `rules` to `text` and returns the final text.
    ///
    /// Never fails: a rule that cannot be compiled or applied is skipped.
    fn apply(&self, text: &str, rules: &[Rule]) -> String {
        self.apply_with_report(text, rules).output
    }

    /// Same as [`SanitizationEngine::apply`], but also reports what each rule
    /// did, in execution order.
    fn apply_with_report(&self, text: &str, rules: &[Rule]) -> SanitizeReport;
}

/// What happened to a single rule during a run.
#[derive(Debug)]
pub enum RuleOutcome {
    /// The rule ran; `replacements` may be zero.
    Applied { replacements: usize },
    /// The rule was skipped and the text left as it was before it.
    Skipped { error: PatternError },
}

#[derive(Debug)]
pub struct RuleReport {
    pub rule: Rule,
    pub outcome: RuleOutcome,
}

/// The result of applying a rule set.
#[derive(Debug)]
pub struct SanitizeReport {
    pub output: String,
    /// True when `output` differs from the input.
    pub changed: bool,
    /// One entry per rule, in the order the rules ran.
    pub rules: Vec<RuleReport>,
}

impl SanitizeReport {
    /// Total number of replacements across all applied rules.
    pub fn total_replacements(&self) -> usize {
        self.rules
            .iter()
            .map(|r| match r.outcome {
                RuleOutcome::Applied { replacements } => replacements,
                RuleOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    /// The rules that were skipped, with their errors.
    pub fn skipped(&self) -> impl Iterator<Item = (&Rule, &PatternError)> {
        self.rules.iter().filter_map(|r| match &r.outcome {
            RuleOutcome::Skipped { error } => Some((&r.rule, error)),
            RuleOutcome::Applied { .. } => None,
        })
    }
}
