//! Configuration types for code-enforcer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default name of the configuration file, relative to the project root.
pub const DEFAULT_CONFIG_FILE: &str = ".code-enforcer.json";

/// Top-level configuration.
///
/// Every field falls back to a built-in default when omitted, so a partial
/// file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Code files checked by rules and the lint engine.
    #[serde(default = "default_code_files", alias = "jsFiles")]
    pub code_files: GlobSpec,

    /// Data files checked by the JSON validator.
    #[serde(default = "default_data_files", alias = "jsonFiles")]
    pub data_files: GlobSpec,

    /// Rule identifier -> filename regexes exempt from that rule.
    #[serde(default)]
    pub disable_rules: BTreeMap<String, Vec<String>>,

    /// Comment tags that must not appear in code.
    #[serde(default = "default_todo_tags")]
    pub todo_tags: Vec<String>,

    /// Path regexes exempt from documentation coverage.
    #[serde(default, rename = "ESDocIgnore")]
    pub doc_ignore: Vec<String>,

    /// Import path prefixes allowed to keep their file extension.
    #[serde(default = "default_import_extension_exceptions")]
    pub import_extension_exceptions: Vec<String>,

    /// Package manifest checked for caret-pinned versions.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Documentation-coverage tool invocation.
    #[serde(default)]
    pub doc_tool: DocToolConfig,

    /// Lint engine invocation.
    #[serde(default)]
    pub lint_tool: LintToolConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            code_files: default_code_files(),
            data_files: default_data_files(),
            disable_rules: BTreeMap::new(),
            todo_tags: default_todo_tags(),
            doc_ignore: Vec::new(),
            import_extension_exceptions: default_import_extension_exceptions(),
            manifest: default_manifest(),
            doc_tool: DocToolConfig::default(),
            lint_tool: LintToolConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or has the wrong shape.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Suppression patterns configured for a rule (empty if none).
    #[must_use]
    pub fn suppressions(&self, rule_name: &str) -> &[String] {
        self.disable_rules.get(rule_name).map_or(&[], Vec::as_slice)
    }
}

/// An include/exclude glob pair selecting one class of files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobSpec {
    /// Glob patterns to expand, in order.
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns removed from the expansion.
    #[serde(default, alias = "ignore")]
    pub exclude: Vec<String>,
}

impl GlobSpec {
    /// Creates a glob spec from include and exclude patterns.
    #[must_use]
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }
}

/// How to invoke the documentation-coverage tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocToolConfig {
    /// Executable run with no arguments from the project root.
    #[serde(default = "default_doc_command")]
    pub command: PathBuf,

    /// The tool's own config file, read to locate its output directory.
    #[serde(default = "default_doc_config")]
    pub config: PathBuf,
}

impl Default for DocToolConfig {
    fn default() -> Self {
        Self {
            command: default_doc_command(),
            config: default_doc_config(),
        }
    }
}

/// How to invoke the lint engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintToolConfig {
    /// Executable receiving `--format json` followed by file paths.
    #[serde(default = "default_lint_command")]
    pub command: PathBuf,
}

impl Default for LintToolConfig {
    fn default() -> Self {
        Self {
            command: default_lint_command(),
        }
    }
}

fn default_code_files() -> GlobSpec {
    GlobSpec::new(["src/**/*.js"], ["**/node_modules/**"])
}

fn default_data_files() -> GlobSpec {
    GlobSpec::new(
        ["*.json", "src/**/*.json"],
        ["**/node_modules/**", "package-lock.json"],
    )
}

fn default_todo_tags() -> Vec<String> {
    vec!["TODO".to_string(), "FIXME".to_string()]
}

fn default_import_extension_exceptions() -> Vec<String> {
    vec!["bignumber".to_string()]
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_doc_command() -> PathBuf {
    PathBuf::from("node_modules/.bin/esdoc")
}

fn default_doc_config() -> PathBuf {
    PathBuf::from(".esdoc.json")
}

fn default_lint_command() -> PathBuf {
    PathBuf::from("node_modules/.bin/eslint")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A regex in `disableRules` or `ESDocIgnore` does not compile.
    #[error("Invalid pattern `{pattern}` in {field}")]
    Pattern {
        /// Config field holding the pattern.
        field: String,
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        source: regex::Error,
    },
}
