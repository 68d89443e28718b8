//! compiler.rs - Turns a rule's stored find-text into an executable matcher.
//!
//! A rule either names its kind explicitly or has it inferred from the text:
//! bracket-delimited text is a character class, text carrying `\n`, `\t` or
//! `\r` escapes is an escaped literal, and everything else is handed to the
//! regex engine as-is. Every compiled matcher replaces globally, left to
//! right, without overlap.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Captures, Regex, RegexBuilder};
use std::borrow::Cow;

use crate::config::{Rule, RuleKind, MAX_PATTERN_LENGTH};
use crate::errors::PatternError;

/// Upper bound on the compiled size of a single rule's regex.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A rule ready to be applied.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    /// The string every match is replaced with.
    pub replace_with: String,
    /// The kind the rule was compiled as, explicit or inferred.
    pub kind: RuleKind,
}

impl CompiledRule {
    /// Replaces every non-overlapping match and reports how many there were.
    ///
    /// Only `Pattern` rules expand `$1`/`${name}` references in the
    /// replacement; the other kinds insert it verbatim.
    pub fn replace_all<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let mut count = 0usize;
        let expand = self.kind == RuleKind::Pattern;
        let replaced = self.regex.replace_all(text, |caps: &Captures| {
            count += 1;
            if expand {
                let mut dst = String::new();
                caps.expand(&self.replace_with, &mut dst);
                dst
            } else {
                self.replace_with.clone()
            }
        });
        (replaced, count)
    }
}

/// Infers how a find-text should be interpreted when the rule doesn't say.
pub fn classify(find: &str) -> RuleKind {
    if find.len() >= 2 && find.starts_with('[') && find.ends_with(']') {
        RuleKind::CharacterClass
    } else if find.contains("\\n") || find.contains("\\t") || find.contains("\\r") {
        RuleKind::EscapedLiteral
    } else {
        RuleKind::Pattern
    }
}

/// Decodes `\n`, `\t` and `\r` two-character sequences into control characters.
pub fn decode_escapes(find: &str) -> String {
    find.replace("\\n", "\n")
        .replace("\\t", "\t")
        .replace("\\r", "\r")
}

/// Escapes a character-class body so that every character stands for
/// itself. A leading `^` still negates and a single `-` still forms a range,
/// but nested classes and the `&&`, `--`, `~~` set operators are disabled.
fn escape_class_body(inner: &str) -> String {
    let chars: Vec<char> = inner.chars().collect();
    let mut out = String::with_capacity(inner.len() * 2);
    for (i, &c) in chars.iter().enumerate() {
        let doubled_dash = c == '-'
            && (chars.get(i + 1) == Some(&'-') || (i > 0 && chars[i - 1] == '-'));
        if matches!(c, '\\' | '[' | ']' | '&' | '~') || doubled_dash {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Produces the regex source for `find` interpreted as `kind`.
fn pattern_source(find: &str, kind: RuleKind) -> String {
    match kind {
        RuleKind::CharacterClass => {
            let inner = find
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .unwrap_or(find);
            format!("[{}]", escape_class_body(inner))
        }
        RuleKind::EscapedLiteral => regex::escape(&decode_escapes(find)),
        RuleKind::Literal => regex::escape(find),
        RuleKind::Pattern => find.to_string(),
    }
}

/// Compiles a single rule.
pub fn compile_rule(rule: &Rule) -> Result<CompiledRule, PatternError> {
    if rule.find.is_empty() {
        return Err(PatternError::Empty);
    }
    if rule.find.len() > MAX_PATTERN_LENGTH {
        return Err(PatternError::TooLong(rule.find.len(), MAX_PATTERN_LENGTH));
    }

    let kind = rule.kind.unwrap_or_else(|| classify(&rule.find));
    let source = pattern_source(&rule.find, kind);
    debug!(
        target: "txtsan_core::sanitizer",
        "Compiling rule (priority {}) as {:?}: {:?}",
        rule.priority, kind, source
    );

    let regex = RegexBuilder::new(&source)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|source| PatternError::Invalid {
            pattern: rule.find.clone(),
            source,
        })?;

    Ok(CompiledRule {
        regex,
        replace_with: rule.replace.clone(),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(rule: &Rule, text: &str) -> String {
        compile_rule(rule).unwrap().replace_all(text).0.into_owned()
    }

    #[test]
    fn classifies_in_priority_order() {
        assert_eq!(classify("[abc]"), RuleKind::CharacterClass);
        // Brackets win even when escapes are present.
        assert_eq!(classify("[\\n]"), RuleKind::CharacterClass);
        assert_eq!(classify("a\\nb"), RuleKind::EscapedLiteral);
        assert_eq!(classify("\\t"), RuleKind::EscapedLiteral);
        assert_eq!(classify("foo.*"), RuleKind::Pattern);
        assert_eq!(classify("["), RuleKind::Pattern);
    }

    #[test]
    fn character_class_matches_any_member() {
        let rule = Rule::new(1, "[!@#]", "");
        assert_eq!(apply(&rule, "hi!@#there"), "hithere");
    }

    #[test]
    fn character_class_escapes_backslashes() {
        // `\d` inside the brackets means "backslash or d", not "digit".
        let rule = Rule::new(1, "[\\d]", "_");
        assert_eq!(apply(&rule, "a\\d1"), "a__1");
    }

    #[test]
    fn character_class_ignores_set_operators() {
        let input = "a[b]&~-";
        assert_eq!(apply(&Rule::new(1, "[[]", ""), input), "ab]&~-");
        assert_eq!(apply(&Rule::new(1, "[&&]", ""), input), "a[b]~-");
        assert_eq!(apply(&Rule::new(1, "[~~]", ""), input), "a[b]&-");
        assert_eq!(apply(&Rule::new(1, "[a&&b]", ""), input), "[]~-");
        assert_eq!(apply(&Rule::new(1, "[-~~]", ""), input), "a[b]&");
        assert_eq!(apply(&Rule::new(1, "[--]", "_"), "a-b"), "a_b");
    }

    #[test]
    fn character_class_keeps_ranges_and_negation() {
        assert_eq!(apply(&Rule::new(1, "[a-c]", ""), "abcd-"), "d-");
        assert_eq!(apply(&Rule::new(1, "[^a-z]", ""), "ab1-C"), "ab");
    }

    #[test]
    fn escaped_literal_decodes_control_characters() {
        let rule = Rule::new(1, "\\n", " ");
        assert_eq!(apply(&rule, "first\nsecond"), "first second");

        let crlf = Rule::new(1, "\\r\\n", "|");
        assert_eq!(apply(&crlf, "a\r\nb\nc"), "a|b\nc");
    }

    #[test]
    fn escaped_literal_does_not_treat_dot_as_wildcard() {
        let rule = Rule::new(1, ".\\t", "-");
        assert_eq!(apply(&rule, "x.\ty\tz"), "x-y\tz");
    }

    #[test]
    fn general_pattern_keeps_metacharacters_live() {
        let rule = Rule::new(1, "a.c", "X");
        assert_eq!(apply(&rule, "abc a.c"), "X X");
    }

    #[test]
    fn explicit_literal_escapes_metacharacters() {
        let rule = Rule::new(1, "a.c", "X").with_kind(RuleKind::Literal);
        assert_eq!(apply(&rule, "abc a.c"), "abc X");
    }

    #[test]
    fn only_patterns_expand_capture_references() {
        let pattern = Rule::new(1, "(\\w+)@example", "$1");
        assert_eq!(apply(&pattern, "me@example"), "me");

        let literal = Rule::new(1, "@", "$1").with_kind(RuleKind::Literal);
        assert_eq!(apply(&literal, "a@b"), "a$1b");
    }

    #[test]
    fn capture_names_extend_over_word_characters() {
        let unbraced = Rule::new(1, "(\\w+)@example", "$1_at");
        assert_eq!(apply(&unbraced, "me@example"), "");

        let braced = Rule::new(1, "(\\w+)@example", "${1}_at");
        assert_eq!(apply(&braced, "me@example"), "me_at");
    }

    #[test]
    fn long_literal_is_rejected_like_any_other_kind() {
        let long = "x".repeat(MAX_PATTERN_LENGTH + 1);
        let rule = Rule::new(1, long, "").with_kind(RuleKind::Literal);
        assert!(matches!(compile_rule(&rule), Err(PatternError::TooLong(_, _))));

        let at_limit = Rule::new(1, "x".repeat(MAX_PATTERN_LENGTH), "").with_kind(RuleKind::Literal);
        assert!(compile_rule(&at_limit).is_ok());
    }

    #[test]
    fn counts_replacements() {
        let compiled = compile_rule(&Rule::new(1, " ", "")).unwrap();
        let (out, count) = compiled.replace_all("a b  c");
        assert_eq!(out, "abc");
        assert_eq!(count, 3);
    }

    #[test]
    fn rejects_empty_long_and_malformed_patterns() {
        assert!(matches!(compile_rule(&Rule::new(1, "", "x")), Err(PatternError::Empty)));

        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        assert!(matches!(
            compile_rule(&Rule::new(1, long, "x")),
            Err(PatternError::TooLong(_, MAX_PATTERN_LENGTH))
        ));

        assert!(matches!(
            compile_rule(&Rule::new(1, "(unclosed", "x")),
            Err(PatternError::Invalid { .. })
        ));
        assert!(matches!(
            compile_rule(&Rule::new(1, "[]", "x")),
            Err(PatternError::Invalid { .. })
        ));
    }
}
