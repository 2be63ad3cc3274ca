//! Rule to forbid explicit `/index` import paths.
//!
//! # Detected Patterns
//!
//! ```text
//! import { a } from './lib/index'
//! ```
//!
//! # Good Patterns
//!
//! ```text
//! import { a } from './lib'
//! ```

use code_enforcer_core::{scanner, Config, Diagnostic, DiagnosticSink, Position, Rule, SourceFile};
use regex::Regex;

/// Rule name for no-index-imports.
pub const NAME: &str = "no-index-imports";

const PATTERN: &str = r"import +.* +from '.*/index'";

/// Flags imports that spell out a directory's `index` module.
#[derive(Debug, Clone)]
pub struct NoIndexImports {
    pattern: Regex,
}

impl NoIndexImports {
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

impl Rule for NoIndexImports {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids importing a directory's index module by name"
    }

    fn filename_pattern(&self) -> &'static str {
        r".*\.js"
    }

    fn check(&self, file: &SourceFile, _config: &Config, sink: &mut DiagnosticSink) {
        for offset in scanner::scan(&file.content, &self.pattern) {
            sink.push(
                Diagnostic::new(
                    "no /index import",
                    "remove /index",
                    file.clone(),
                    Position::Offset(offset),
                )
                .with_source(NAME),
            );
        }
    }
}
