//! Pattern search over raw text.
//!
//! Rules work on unparsed source, so everything here is plain regex
//! matching in multi-line mode (`^`/`$` anchor at line boundaries).

use regex::{Regex, RegexBuilder};

/// Compiles `pattern` with multi-line anchors enabled.
///
/// # Errors
///
/// Returns an error if the pattern is not a valid regular expression.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).multi_line(true).build()
}

/// Compiles `pattern` with multi-line anchors and case-insensitive matching.
///
/// # Errors
///
/// Returns an error if the pattern is not a valid regular expression.
pub fn compile_case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .case_insensitive(true)
        .build()
}

/// Yields the starting byte offset of every non-overlapping match of
/// `pattern` in `content`, left to right.
///
/// Each call scans from the start; an empty `content` yields nothing.
pub fn scan<'a>(content: &'a str, pattern: &'a Regex) -> impl Iterator<Item = usize> + 'a {
    pattern.find_iter(content).map(|m| m.start())
}
