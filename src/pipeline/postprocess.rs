//! Post-processing: deterministic cleanup of the raw model output.
//!
//! Even a well-prompted model occasionally wraps its table in
//! ` ```tsv ... ``` ` fences, emits Windows line endings, or sprinkles
//! zero-width characters through the text. These rules fix such quirks
//! without touching content, so row counting and aggregation operate on a
//! predictable shape. Each rule is a pure function and independently
//! testable.
//!
//! Rule order matters: fences are stripped before line-based rules so the
//! fence markers are never counted as rows, and blank lines are dropped
//! last so every remaining line is a record.

use once_cell::sync::Lazy;
use regex::Regex;

/// Clean a raw response into table lines.
///
/// Applies, in order: outer-fence stripping, CRLF normalisation,
/// invisible-character removal, per-line trailing-whitespace trim, blank
/// line removal. The result has one record per line and no trailing
/// newline; an unusable response cleans to the empty string.
pub fn clean_table(input: &str) -> String {
    let s = strip_table_fences(input);
    let s = normalise_line_endings(&s);
    let s = remove_invisible_chars(&s);
    s.lines()
        .map(|line| line.trim_end())
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of question rows in a cleaned table.
///
/// The first line is assumed to be a header and subtracted; a table with
/// no lines (or only a header) counts zero.
pub fn question_count(table: &str) -> usize {
    table
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
        .saturating_sub(1)
}

/// The data rows of a cleaned table: everything after the first line.
///
/// The first line is dropped unconditionally. When the service answers
/// without a header the first data row is lost with it; see the pinned
/// behaviour in the tests below before changing this.
pub fn data_rows(table: &str) -> Vec<&str> {
    table.lines().skip(1).collect()
}

// ── Rule 1: Strip outer code fences ──────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:tsv|text)?\n(.*)\n```\s*$").unwrap());

fn strip_table_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Remove invisible Unicode characters ──────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Tests ────────────────────────────────────────────────────────────────
