//! Static-analysis (lint) engine boundary.

use super::ToolError;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const TOOL: &str = "eslint";

/// Lint results for one file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintFileResult {
    /// Path of the linted file, as reported by the engine.
    pub file_path: PathBuf,
    /// Problems found in the file.
    #[serde(default)]
    pub messages: Vec<LintMessage>,
}

/// One problem reported by the lint engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    /// Human-readable message, usually ending in a period.
    pub message: String,
    /// Identifier of the violated rule; absent for fatal parse errors.
    #[serde(default)]
    pub rule_id: Option<String>,
    /// Line number (1-indexed).
    #[serde(default)]
    pub line: Option<usize>,
    /// Column number (1-indexed).
    #[serde(default)]
    pub column: Option<usize>,
}

/// An external lint engine.
pub trait LintEngine: Send + Sync {
    /// Lints `paths` and returns per-file results.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine crashes or its output is malformed.
    fn lint(&self, paths: &[PathBuf]) -> Result<Vec<LintFileResult>, ToolError>;
}

/// Runs the project's ESLint binary with JSON output.
#[derive(Debug, Clone)]
pub struct EslintEngine {
    command: PathBuf,
    root: PathBuf,
}

impl EslintEngine {
    /// Creates an engine running `command` from `root`.
    #[must_use]
    pub fn new(command: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            root: root.into(),
        }
    }

    fn program(&self) -> PathBuf {
        resolve_program(&self.root, &self.command)
    }
}

/// Resolves a configured tool path: bare names go through `PATH`, anything
/// with a directory component is taken relative to `root`.
pub(crate) fn resolve_program(root: &Path, command: &Path) -> PathBuf {
    if command.is_absolute() || command.components().count() == 1 {
        command.to_path_buf()
    } else {
        root.join(command)
    }
}

impl LintEngine for EslintEngine {
    fn lint(&self, paths: &[PathBuf]) -> Result<Vec<LintFileResult>, ToolError> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let program = self.program();
        debug!("Running {} on {} files", program.display(), paths.len());

        let output = Command::new(&program)
            .arg("--format")
            .arg("json")
            .args(paths)
            .current_dir(&self.root)
            .output()
            .map_err(|e| ToolError::Spawn {
                tool: TOOL,
                command: program.clone(),
                source: e,
            })?;

        // 0 = clean, 1 = problems found; anything else is a crash
        match output.status.code() {
            Some(0 | 1) => {}
            _ => {
                return Err(ToolError::Exit {
                    tool: TOOL,
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                })
            }
        }

        parse_report(&output.stdout)
    }
}

/// Parses ESLint's `--format json` report.
pub(crate) fn parse_report(stdout: &[u8]) -> Result<Vec<LintFileResult>, ToolError> {
    serde_json::from_slice(stdout).map_err(|e| ToolError::Output {
        tool: TOOL,
        what: "stdout".to_string(),
        message: e.to_string(),
    })
}
