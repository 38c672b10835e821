//! Output normalization: the uniform cleanup applied to every extraction
//! result before it is considered usable.
//!
//! Both the text-layer strategies and the OCR engine produce text with
//! inconsistent whitespace — CRLF line endings from some PDF producers,
//! trailing spaces on justified lines, and tall stacks of blank lines where
//! the page had vertical gaps. Normalization makes results comparable so the
//! pipeline's "is this usable?" check is a single emptiness test, and gives
//! the assembled document a predictable spacing rhythm that downstream
//! Markdown renderers rely on.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: line endings are normalised before
//! anything counts newlines, per-line trailing trim runs before blank-line
//! collapsing so "  \n  \n" collapses like "\n\n", and the outer trim runs
//! last.

use once_cell::sync::Lazy;
use regex::Regex;

/// Normalize raw extraction output.
///
/// Runs four deterministic passes in a defined order, each a pure
/// `&str → String` function with no shared state:
/// 1. Normalise line endings (CRLF/CR → LF)
/// 2. Trim trailing whitespace per line
/// 3. Collapse runs of 3+ consecutive newlines down to exactly 2
/// 4. Strip leading/trailing whitespace
///
/// The result may be empty; the caller treats an empty result as "this
/// source produced no usable text".
pub fn normalize(input: &str) -> String {
    let s = normalise_line_endings(input);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 3: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
