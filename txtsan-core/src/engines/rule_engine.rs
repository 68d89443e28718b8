// txtsan-core/src/engines/rule_engine.rs
//! A `SanitizationEngine` that applies ordered find/replace rules with
//! per-rule fault isolation.
//! License: MIT OR APACHE 2.0

use log::{debug, warn};

use crate::config::Rule;
use crate::engine::{RuleOutcome, RuleReport, SanitizationEngine, SanitizeReport};
use crate::sanitizers::compiler::compile_rule;

/// Applies rules in ascending priority order. Equal priorities keep the
/// order they were given in.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SanitizationEngine for RuleEngine {
    fn apply_with_report(&self, text: &str, rules: &[Rule]) -> SanitizeReport {
        let mut ordered: Vec<&Rule> = rules.iter().collect();
        // `sort_by_key` is stable.
        ordered.sort_by_key(|rule| rule.priority);

        let mut working = text.to_string();
        let mut reports = Vec::with_capacity(ordered.len());

        for rule in ordered {
            let outcome = match compile_rule(rule) {
                Ok(compiled) => {
                    let (replaced, replacements) = compiled.replace_all(&working);
                    working = replaced.into_owned();
                    debug!(
                        "Rule (priority {}) made {} replacement(s).",
                        rule.priority, replacements
                    );
                    RuleOutcome::Applied { replacements }
                }
                Err(error) => {
                    warn!(
                        "Skipping rule (priority {}, find {:?}): {}",
                        rule.priority, rule.find, error
                    );
                    RuleOutcome::Skipped { error }
                }
            };
            reports.push(RuleReport {
                rule: rule.clone(),
                outcome,
            });
        }

        SanitizeReport {
            changed: working != text,
            output: working,
            rules: reports,
        }
    }
}
