//! Rule to forbid `.js` suffixes on import paths.
//!
//! Some packages are published under a name that itself ends in `.js`
//! (`bignumber.js`). Paths starting with one of the configured
//! `importExtensionExceptions` are allowed through.

use code_enforcer_core::{scanner, Config, Diagnostic, DiagnosticSink, Position, Rule, SourceFile};
use regex::Regex;

/// Rule name for no-extension-imports.
pub const NAME: &str = "no-extension-imports";

const PATTERN: &str = r"import .* from '(.*)\.js'";

/// Flags imports that carry an explicit `.js` extension.
#[derive(Debug, Clone)]
pub struct NoExtensionImports {
    pattern: Regex,
}

impl NoExtensionImports {
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

impl Rule for NoExtensionImports {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids file extensions in import paths"
    }

    fn filename_pattern(&self) -> &'static str {
        r".*\.js"
    }

    fn check(&self, file: &SourceFile, config: &Config, sink: &mut DiagnosticSink) {
        for caps in self.pattern.captures_iter(&file.content) {
            let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let exempt = config
                .import_extension_exceptions
                .iter()
                .any(|prefix| path.as_str().starts_with(prefix.as_str()));
            if exempt {
                continue;
            }

            sink.push(
                Diagnostic::new(
                    "no .js import",
                    "remove .js",
                    file.clone(),
                    Position::Offset(whole.start()),
                )
                .with_source(NAME),
            );
        }
    }
}
