//! Rule to forbid direct console output.
//!
//! Every `console.` occurrence is reported, including ones inside comments
//! and strings; the check works on raw text.

use code_enforcer_core::{scanner, Config, Diagnostic, DiagnosticSink, Position, Rule, SourceFile};
use regex::Regex;

/// Rule name for console-style-calls.
pub const NAME: &str = "console-style-calls";

const PATTERN: &str = r"console\.";

/// Flags `console.*` calls.
#[derive(Debug, Clone)]
pub struct ConsoleCalls {
    pattern: Regex,
}

impl ConsoleCalls {
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

impl Rule for ConsoleCalls {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids console calls in favor of a logging library"
    }

    fn filename_pattern(&self) -> &'static str {
        r".*\.js"
    }

    fn check(&self, file: &SourceFile, _config: &Config, sink: &mut DiagnosticSink) {
        for offset in scanner::scan(&file.content, &self.pattern) {
            sink.push(
                Diagnostic::new(
                    "no console calls",
                    "use logging library",
                    file.clone(),
                    Position::Offset(offset),
                )
                .with_source(NAME),
            );
        }
    }
}
