//! Documentation-coverage tool boundary.
//!
//! The tool runs as a separate process and writes two artifacts into its
//! output directory: `coverage.json` and `lint.json`. The enforcer awaits the
//! process, then reads both.

use super::lint::resolve_program;
use super::ToolError;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

const TOOL: &str = "esdoc";

/// Coverage figures for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageEntry {
    /// Number of documented symbols.
    pub actual_count: u64,
    /// Number of symbols that should be documented.
    pub expect_count: u64,
    /// Lines (1-indexed) of undocumented symbols.
    #[serde(default)]
    pub undocument_lines: Vec<usize>,
}

impl CoverageEntry {
    /// Whether every expected symbol is documented.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.actual_count == self.expect_count
    }
}

/// One line reference inside a doc-lint record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocLintLine {
    /// Line number as reported by the tool (0-indexed).
    pub line_number: usize,
    /// Text of the line, when reported.
    #[serde(default)]
    pub line: Option<String>,
}

/// A mismatch between a symbol's signature and its documentation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocLintRecord {
    /// Path of the offending file.
    pub file_path: PathBuf,
    /// Lines the record refers to; the first one is reported.
    #[serde(default)]
    pub lines: Vec<DocLintLine>,
    /// Parameter names found in code.
    #[serde(default)]
    pub code_params: Vec<String>,
    /// Parameter names found in documentation.
    #[serde(default)]
    pub doc_params: Vec<String>,
}

/// Everything the documentation tool reported for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocReport {
    /// Per-file coverage in the order the tool reported it.
    pub coverage: Vec<(String, CoverageEntry)>,
    /// Doc-lint records.
    pub lint: Vec<DocLintRecord>,
}

/// An external documentation-coverage tool.
#[async_trait]
pub trait DocTool: Send + Sync {
    /// Runs the tool to completion and collects its report.
    ///
    /// # Errors
    ///
    /// Returns an error if the process fails or its artifacts are unreadable.
    async fn check(&self) -> Result<DocReport, ToolError>;
}

/// Runs the project's ESDoc binary and reads its artifacts.
#[derive(Debug, Clone)]
pub struct EsdocTool {
    command: PathBuf,
    config: PathBuf,
    root: PathBuf,
}

#[derive(Deserialize)]
struct EsdocConfig {
    destination: PathBuf,
}

#[derive(Deserialize)]
struct CoverageFile {
    #[serde(default)]
    files: serde_json::Map<String, serde_json::Value>,
}

impl EsdocTool {
    /// Creates a tool running `command` from `root`, configured by `config`.
    #[must_use]
    pub fn new(
        command: impl Into<PathBuf>,
        config: impl Into<PathBuf>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command: command.into(),
            config: config.into(),
            root: root.into(),
        }
    }

    /// Reads both artifacts from the tool's configured destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool config or either artifact is missing or
    /// malformed.
    pub async fn read_artifacts(&self) -> Result<DocReport, ToolError> {
        let config: EsdocConfig = read_json(&self.root.join(&self.config)).await?;
        let destination = self.root.join(config.destination);

        let coverage_path = destination.join("coverage.json");
        let coverage: CoverageFile = read_json(&coverage_path).await?;
        let lint: Vec<DocLintRecord> = read_json(&destination.join("lint.json")).await?;

        let coverage = coverage
            .files
            .into_iter()
            .map(|(name, value)| {
                serde_json::from_value(value)
                    .map(|entry| (name, entry))
                    .map_err(|e| ToolError::Output {
                        tool: TOOL,
                        what: coverage_path.display().to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DocReport { coverage, lint })
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ToolError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ToolError::Read {
            tool: TOOL,
            path: path.to_path_buf(),
            source: e,
        })?;
    serde_json::from_str(&content).map_err(|e| ToolError::Output {
        tool: TOOL,
        what: path.display().to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl DocTool for EsdocTool {
    async fn check(&self) -> Result<DocReport, ToolError> {
        let program = resolve_program(&self.root, &self.command);
        debug!("Running {}", program.display());

        let output = Command::new(&program)
            .current_dir(&self.root)
            .output()
            .await
            .map_err(|e| ToolError::Spawn {
                tool: TOOL,
                command: program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ToolError::Exit {
                tool: TOOL,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        self.read_artifacts().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_artifacts(root: &Path, coverage: &str, lint: &str) {
        fs::write(root.join(".esdoc.json"), r#"{ "source": "./src", "destination": "./docs" }"#)
            .unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/coverage.json"), coverage).unwrap();
        fs::write(root.join("docs/lint.json"), lint).unwrap();
    }

    #[tokio::test]
    async fn reads_artifacts_from_destination() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(
            tmp.path(),
            r#"{
                "coverage": "50%",
                "expectCount": 2,
                "actualCount": 1,
                "files": {
                    "src/a.js": { "expectCount": 2, "actualCount": 1, "undocumentLines": [4] }
                }
            }"#,
            r#"[
                {
                    "name": "add",
                    "filePath": "src/a.js",
                    "lines": [{ "lineNumber": 9, "line": "function add(a, b) {" }],
                    "codeParams": ["a", "b"],
                    "docParams": ["x"]
                }
            ]"#,
        );

        let tool = EsdocTool::new("esdoc", ".esdoc.json", tmp.path());
        let report = tool.read_artifacts().await.unwrap();

        let (name, entry) = &report.coverage[0];
        assert_eq!(name, "src/a.js");
        assert!(!entry.is_complete());
        assert_eq!(entry.undocument_lines, vec![4]);
        assert_eq!(report.lint.len(), 1);
        assert_eq!(report.lint[0].lines[0].line_number, 9);
        assert_eq!(report.lint[0].doc_params, vec!["x"]);
    }

    #[tokio::test]
    async fn coverage_keeps_reported_order() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(
            tmp.path(),
            r#"{
                "files": {
                    "src/z.js": { "expectCount": 1, "actualCount": 1 },
                    "src/a.js": { "expectCount": 1, "actualCount": 0 },
                    "src/m.js": { "expectCount": 0, "actualCount": 0 }
                }
            }"#,
            "[]",
        );

        let tool = EsdocTool::new("esdoc", ".esdoc.json", tmp.path());
        let report = tool.read_artifacts().await.unwrap();

        let names: Vec<&str> = report.coverage.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["src/z.js", "src/a.js", "src/m.js"]);
    }

    #[tokio::test]
    async fn malformed_coverage_entry_is_an_output_error() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path(), r#"{ "files": { "src/a.js": { "expectCount": "x" } } }"#, "[]");

        let tool = EsdocTool::new("esdoc", ".esdoc.json", tmp.path());
        let err = tool.read_artifacts().await.unwrap_err();
        assert!(matches!(err, ToolError::Output { .. }));
    }

    #[tokio::test]
    async fn missing_artifact_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".esdoc.json"), r#"{ "destination": "out" }"#).unwrap();

        let tool = EsdocTool::new("esdoc", ".esdoc.json", tmp.path());
        let err = tool.read_artifacts().await.unwrap_err();
        assert!(matches!(err, ToolError::Read { .. }));
    }

    #[tokio::test]
    async fn malformed_artifact_is_an_output_error() {
        let tmp = TempDir::new().unwrap();
        write_artifacts(tmp.path(), "{ not json", "[]");

        let tool = EsdocTool::new("esdoc", ".esdoc.json", tmp.path());
        let err = tool.read_artifacts().await.unwrap_err();
        assert!(matches!(err, ToolError::Output { .. }));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let tool = EsdocTool::new("node_modules/.bin/esdoc", ".esdoc.json", tmp.path());
        let err = tool.check().await.unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
