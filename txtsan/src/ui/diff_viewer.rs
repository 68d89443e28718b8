// txtsan/src/ui/diff_viewer.rs
//! Unified diff between the original and sanitized text.

use diffy::{create_patch, PatchFormatter};
use std::io::{self, Write};

/// Writes a unified diff of `original` against `sanitized`.
pub fn print_diff<W: Write>(
    original: &str,
    sanitized: &str,
    writer: &mut W,
    supports_color: bool,
) -> io::Result<()> {
    let patch = create_patch(original, sanitized);
    if patch.hunks().is_empty() {
        return writeln!(writer, "No changes.");
    }
    let formatter = if supports_color {
        PatchFormatter::new().with_color()
    } else {
        PatchFormatter::new()
    };
    write!(writer, "{}", formatter.fmt_patch(&patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_removed_and_added_lines() {
        let mut out = Vec::new();
        print_diff("a b\n", "ab\n", &mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("-a b"));
        assert!(text.contains("+ab"));
    }

    #[test]
    fn reports_identical_input() {
        let mut out = Vec::new();
        print_diff("same\n", "same\n", &mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No changes.\n");
    }
}
