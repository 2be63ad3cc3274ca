//! Rule to keep source files within printable ASCII.
//!
//! # Rationale
//!
//! Non-English text belongs in the localization layer, not in comments or
//! string literals. Stray non-ASCII characters (smart quotes, non-breaking
//! spaces) also tend to slip in through copy-paste.
//!
//! # Detected Patterns
//!
//! Any run of characters outside `\0`..=`~`. A contiguous run is reported
//! once, at its first byte.

use code_enforcer_core::{scanner, Config, Diagnostic, DiagnosticSink, Position, Rule, SourceFile};
use regex::Regex;

/// Rule name for ascii-only.
pub const NAME: &str = "ascii-only";

const PATTERN: &str = r"[^\x00-~]+";

/// Flags non-ASCII characters.
#[derive(Debug, Clone)]
pub struct AsciiOnly {
    pattern: Regex,
}

impl AsciiOnly {
    /// Creates a new rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the content pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: scanner::compile(PATTERN)?,
        })
    }
}

impl Rule for AsciiOnly {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids characters outside printable ASCII"
    }

    fn filename_pattern(&self) -> &'static str {
        r".*\.js"
    }

    fn check(&self, file: &SourceFile, _config: &Config, sink: &mut DiagnosticSink) {
        for offset in scanner::scan(&file.content, &self.pattern) {
            sink.push(
                Diagnostic::new(
                    "ASCII characters only",
                    "comments in English, use localization library",
                    file.clone(),
                    Position::Offset(offset),
                )
                .with_source(NAME),
            );
        }
    }
}
