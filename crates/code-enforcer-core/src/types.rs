//! Core types for diagnostics and run results.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A source file snapshot, loaded once per run.
///
/// Identity is the path; the content is never refreshed after loading.
/// Cloning is cheap, so diagnostics carry their own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the project root, as reported to the user.
    pub path: PathBuf,
    /// Full text of the file at load time.
    pub content: Arc<str>,
}

impl SourceFile {
    /// Creates a new source file snapshot.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns the path as a string for pattern matching and display.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }

    /// Returns the path of this file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Where a diagnostic points inside its file.
///
/// Offsets and line numbers are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Byte offset into the file content.
    Offset(usize),
    /// 1-indexed line, with an optional 1-indexed column.
    Line {
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed), when the source reported one.
        column: Option<usize>,
    },
    /// No positional information (e.g. a whole-file problem).
    Unknown,
}

impl Position {
    /// Creates a line position without a column.
    #[must_use]
    pub fn line(line: usize) -> Self {
        Self::Line { line, column: None }
    }
}

/// A normalized report of one compliance problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable description of the problem.
    pub problem: String,
    /// Suggested remediation.
    pub solution: String,
    /// The file the problem was found in.
    pub file: SourceFile,
    /// Position of the problem inside `file`.
    pub position: Position,
    /// Identifier of the rule or stage that produced this diagnostic.
    pub source: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        problem: impl Into<String>,
        solution: impl Into<String>,
        file: SourceFile,
        position: Position,
    ) -> Self {
        Self {
            problem: problem.into(),
            solution: solution.into(),
            file,
            position,
            source: None,
        }
    }

    /// Records which rule or stage produced this diagnostic.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file.path.display())?;
        match self.position {
            Position::Offset(offset) => write!(f, "@{offset}")?,
            Position::Line { line, column: None } => write!(f, ":{line}")?,
            Position::Line {
                line,
                column: Some(column),
            } => write!(f, ":{line}:{column}")?,
            Position::Unknown => {}
        }
        write!(f, ": {}", self.problem)
    }
}

/// Append-only accumulator of diagnostics for one run.
///
/// Rules and pipeline stages only ever push; nothing is mutated or removed
/// once added, so collection order is execution order.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Number of diagnostics collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true when nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Iterates over the collected diagnostics in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Consumes the sink, returning the collected diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl<'a> IntoIterator for &'a DiagnosticSink {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Final, read-only result of an enforcer run.
#[derive(Debug, Default)]
pub struct Report {
    /// All diagnostics, in execution order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of code files checked by rules.
    pub files_checked: usize,
}

impl Report {
    /// Returns true when the run produced no diagnostics.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics produced by the given rule or stage.
    #[must_use]
    pub fn by_source(&self, source: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.source.as_deref() == Some(source))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> SourceFile {
        SourceFile::new("src/index.js", "const a = 1;\n")
    }

    #[test]
    fn sink_preserves_insertion_order() {
        let mut sink = DiagnosticSink::new();
        sink.push(Diagnostic::new("first", "", file(), Position::Offset(0)));
        sink.push(Diagnostic::new("second", "", file(), Position::line(1)));

        let problems: Vec<&str> = sink.iter().map(|d| d.problem.as_str()).collect();
        assert_eq!(problems, vec!["first", "second"]);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn display_includes_position() {
        let d = Diagnostic::new(
            "bad",
            "fix",
            file(),
            Position::Line {
                line: 3,
                column: Some(7),
            },
        );
        assert_eq!(d.to_string(), "src/index.js:3:7: bad");

        let d = Diagnostic::new("bad", "fix", file(), Position::Unknown);
        assert_eq!(d.to_string(), "src/index.js: bad");
    }

    #[test]
    fn report_filters_by_source() {
        let report = Report {
            diagnostics: vec![
                Diagnostic::new("a", "", file(), Position::Offset(1)).with_source("ascii-only"),
                Diagnostic::new("b", "", file(), Position::Offset(2)).with_source("manifest"),
            ],
            files_checked: 1,
        };
        assert_eq!(report.by_source("manifest").len(), 1);
        assert!(!report.is_clean());
    }
}
