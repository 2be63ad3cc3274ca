//! The enforcer: sequences every check of a run into one diagnostic list.

use crate::config::{Config, ConfigError};
use crate::file_set::{FileSetBuilder, FileSetError};
use crate::rule::{RegistryError, Rule, RuleBox, RuleRegistry};
use crate::scanner;
use crate::tools::{
    DocReport, DocTool, EsdocTool, EslintEngine, JsonFormatter, LintEngine, SerdeJsonFormatter,
    ToolError,
};
use crate::types::{Diagnostic, DiagnosticSink, Position, Report, SourceFile};

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Source label for documentation-coverage diagnostics.
pub const DOC_SOURCE: &str = "esdoc";
/// Source label for lint engine diagnostics.
pub const LINT_SOURCE: &str = "eslint";
/// Source label for JSON validation diagnostics.
pub const JSON_SOURCE: &str = "jsonlint";
/// Source label for manifest diagnostics.
pub const MANIFEST_SOURCE: &str = "manifest";

const CARET_VERSION: &str = r#""\^(\d+)\.(\d+)\.(\d+)""#;

/// Fatal errors that abort a run.
#[derive(Debug, Error)]
pub enum EnforcerError {
    /// Invalid configuration.
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),

    /// A rule could not be loaded.
    #[error("Failed to load rules")]
    Registry(#[from] RegistryError),

    /// File selection or reading failed.
    #[error("Failed to read project files")]
    FileSet(#[from] FileSetError),

    /// An external tool failed.
    #[error("External tool failed")]
    Tool(#[from] ToolError),

    /// A pattern built into the enforcer itself failed to compile.
    #[error("Invalid built-in pattern `{pattern}`")]
    Pattern {
        /// The offending pattern.
        pattern: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
}

/// Pipeline stages, in the only order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Configuration merged, nothing loaded yet.
    Init,
    /// Rule registry populated.
    RulesLoaded,
    /// Code and data file sets loaded.
    FilesBuilt,
    /// Documentation coverage checked.
    DocChecked,
    /// Every rule run over every applicable code file.
    RulesRun,
    /// Lint engine results collected.
    LintRun,
    /// Data files validated.
    JsonChecked,
    /// Manifest checked for caret-pinned versions.
    ManifestChecked,
    /// Diagnostics are final.
    Done,
}

/// Builder for configuring an [`Enforcer`].
#[derive(Default)]
pub struct EnforcerBuilder {
    root: Option<PathBuf>,
    config: Option<Config>,
    rules: Vec<RuleBox>,
    lint_engine: Option<Box<dyn LintEngine>>,
    doc_tool: Option<Box<dyn DocTool>>,
    json_formatter: Option<Box<dyn JsonFormatter>>,
}

impl EnforcerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root; patterns and tools resolve against it.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Replaces the lint engine (default: [`EslintEngine`]).
    #[must_use]
    pub fn lint_engine(mut self, engine: impl LintEngine + 'static) -> Self {
        self.lint_engine = Some(Box::new(engine));
        self
    }

    /// Replaces the documentation tool (default: [`EsdocTool`]).
    #[must_use]
    pub fn doc_tool(mut self, tool: impl DocTool + 'static) -> Self {
        self.doc_tool = Some(Box::new(tool));
        self
    }

    /// Replaces the JSON formatter (default: [`SerdeJsonFormatter`]).
    #[must_use]
    pub fn json_formatter(mut self, formatter: impl JsonFormatter + 'static) -> Self {
        self.json_formatter = Some(Box::new(formatter));
        self
    }

    /// Builds the enforcer.
    ///
    /// A relative root is resolved against the current directory here, so
    /// tools spawned inside the root never see it applied twice.
    ///
    /// # Errors
    ///
    /// Returns an error if a `disableRules` or `ESDocIgnore` regex is invalid.
    pub fn build(self) -> Result<Enforcer, EnforcerError> {
        let root = absolute(self.root.unwrap_or_else(|| PathBuf::from(".")));
        let config = self.config.unwrap_or_default();
        let suppressions = Suppressions::compile(&config)?;
        let caret_version =
            scanner::compile(CARET_VERSION).map_err(|e| EnforcerError::Pattern {
                pattern: CARET_VERSION,
                source: e,
            })?;

        let lint_engine = self.lint_engine.unwrap_or_else(|| {
            Box::new(EslintEngine::new(config.lint_tool.command.clone(), &root))
        });
        let doc_tool = self.doc_tool.unwrap_or_else(|| {
            Box::new(EsdocTool::new(
                config.doc_tool.command.clone(),
                config.doc_tool.config.clone(),
                &root,
            ))
        });
        let json_formatter = self
            .json_formatter
            .unwrap_or_else(|| Box::new(SerdeJsonFormatter));

        Ok(Enforcer {
            files: FileSetBuilder::new(&root),
            root,
            config,
            suppressions,
            caret_version,
            pending_rules: self.rules,
            registry: RuleRegistry::default(),
            lint_engine,
            doc_tool,
            json_formatter,
            code_files: Vec::new(),
            data_files: Vec::new(),
            sink: DiagnosticSink::new(),
            stage: Stage::Init,
        })
    }
}

/// Makes `root` absolute against the current directory, dropping `.`
/// components.
fn absolute(root: PathBuf) -> PathBuf {
    let joined = if root.is_absolute() {
        root
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(root),
            Err(e) => {
                warn!("Cannot resolve current directory, keeping {:?}: {}", root, e);
                return root;
            }
        }
    };
    joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Compiled `disableRules` and `ESDocIgnore` patterns.
struct Suppressions {
    per_rule: Vec<(String, Vec<Regex>)>,
    doc_ignore: Vec<Regex>,
}

impl Suppressions {
    fn compile(config: &Config) -> Result<Self, ConfigError> {
        let per_rule = config
            .disable_rules
            .iter()
            .map(|(rule, patterns)| {
                compile_all(&format!("disableRules.{rule}"), patterns)
                    .map(|compiled| (rule.clone(), compiled))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let doc_ignore = compile_all("ESDocIgnore", &config.doc_ignore)?;
        Ok(Self {
            per_rule,
            doc_ignore,
        })
    }

    fn is_suppressed(&self, rule: &str, file_name: &str) -> bool {
        self.per_rule
            .iter()
            .filter(|(name, _)| name == rule)
            .flat_map(|(_, patterns)| patterns)
            .any(|p| p.is_match(file_name))
    }

    fn is_doc_ignored(&self, file_name: &str) -> bool {
        self.doc_ignore.iter().any(|p| p.is_match(file_name))
    }
}

fn compile_all(field: &str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| ConfigError::Pattern {
                field: field.to_string(),
                pattern: p.clone(),
                source: e,
            })
        })
        .collect()
}

/// Owns one run: configuration, file sets, rules and the diagnostic sink.
///
/// Use [`Enforcer::builder()`] to construct an instance.
pub struct Enforcer {
    root: PathBuf,
    config: Config,
    suppressions: Suppressions,
    caret_version: Regex,
    files: FileSetBuilder,
    pending_rules: Vec<RuleBox>,
    registry: RuleRegistry,
    lint_engine: Box<dyn LintEngine>,
    doc_tool: Box<dyn DocTool>,
    json_formatter: Box<dyn JsonFormatter>,
    code_files: Vec<SourceFile>,
    data_files: Vec<SourceFile>,
    sink: DiagnosticSink,
    stage: Stage,
}

impl std::fmt::Debug for Enforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enforcer")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Enforcer {
    /// Creates a new builder for configuring an enforcer.
    #[must_use]
    pub fn builder() -> EnforcerBuilder {
        EnforcerBuilder::new()
    }

    /// Returns the absolute project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the effective configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the current pipeline stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs every stage in order and returns the final diagnostics.
    ///
    /// Only the documentation stage suspends; everything else runs to
    /// completion before the next stage starts.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid configuration, a broken rule, an
    /// unreadable selected file, or a failing external tool.
    pub async fn run(mut self) -> Result<Report, EnforcerError> {
        info!("Starting run at {:?}", self.root);

        self.load_rules()?;
        self.build_file_sets()?;
        self.check_docs().await?;
        self.run_rules();
        self.run_lint()?;
        self.check_json();
        self.check_manifest()?;
        self.advance(Stage::Done);

        info!("Run complete: {} diagnostics", self.sink.len());

        Ok(Report {
            diagnostics: self.sink.into_vec(),
            files_checked: self.code_files.len(),
        })
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage {next:?} after {:?}", self.stage);
        debug!("Stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn load_rules(&mut self) -> Result<(), EnforcerError> {
        self.registry = RuleRegistry::load(std::mem::take(&mut self.pending_rules))?;
        info!("Loaded {} rules", self.registry.len());
        self.advance(Stage::RulesLoaded);
        Ok(())
    }

    fn build_file_sets(&mut self) -> Result<(), EnforcerError> {
        self.code_files = self.files.build(&[&self.config.code_files])?;
        self.data_files = self.files.build(&[&self.config.data_files])?;
        info!(
            "Found {} code files and {} data files",
            self.code_files.len(),
            self.data_files.len()
        );
        self.advance(Stage::FilesBuilt);
        Ok(())
    }

    async fn check_docs(&mut self) -> Result<(), EnforcerError> {
        let report = self.doc_tool.check().await?;
        self.record_doc_report(&report)?;
        self.advance(Stage::DocChecked);
        Ok(())
    }

    fn record_doc_report(&mut self, report: &DocReport) -> Result<(), EnforcerError> {
        for (name, entry) in &report.coverage {
            if self.suppressions.is_doc_ignored(name) {
                debug!("Skipping documentation coverage for {}", name);
                continue;
            }
            if entry.is_complete() {
                continue;
            }

            let file = self.files.read(Path::new(name))?;
            for &line in &entry.undocument_lines {
                self.sink.push(
                    Diagnostic::new(
                        "not documented",
                        "add documentation comments: /** */",
                        file.clone(),
                        Position::line(line),
                    )
                    .with_source(DOC_SOURCE),
                );
            }
        }

        for record in &report.lint {
            let file = self.files.read(&self.files.relative(&record.file_path))?;
            let params: Vec<&str> = record
                .code_params
                .iter()
                .chain(&record.doc_params)
                .map(String::as_str)
                .collect();
            let position = record
                .lines
                .first()
                .map_or(Position::Unknown, |l| Position::line(l.line_number + 1));

            self.sink.push(
                Diagnostic::new(
                    format!("doc linting error for {}", params.join(",")),
                    "fix the documentation (parameters, return types)",
                    file,
                    position,
                )
                .with_source(DOC_SOURCE),
            );
        }

        Ok(())
    }

    fn run_rules(&mut self) {
        for registered in self.registry.iter() {
            let name = registered.name();
            for file in &self.code_files {
                let file_name = file.name();
                if self.suppressions.is_suppressed(name, &file_name) {
                    debug!("Rule {} suppressed for {}", name, file_name);
                    continue;
                }
                if !registered.applies_to(&file_name) {
                    continue;
                }

                let before = self.sink.len();
                registered.rule().check(file, &self.config, &mut self.sink);
                debug!(
                    "Rule {} found {} problems in {}",
                    name,
                    self.sink.len() - before,
                    file_name
                );
            }
        }
        self.advance(Stage::RulesRun);
    }

    fn run_lint(&mut self) -> Result<(), EnforcerError> {
        let paths: Vec<PathBuf> = self
            .code_files
            .iter()
            .map(|f| self.root.join(&f.path))
            .collect();
        let results = self.lint_engine.lint(&paths)?;

        for result in results {
            if result.messages.is_empty() {
                continue;
            }

            let relative = self.files.relative(&result.file_path);
            let file = match self.code_files.iter().find(|f| f.path == relative) {
                Some(f) => f.clone(),
                None => self.files.read(&relative)?,
            };

            for message in result.messages {
                let rule_id = message.rule_id.as_deref().unwrap_or("parse-error");
                let position = message.line.map_or(Position::Unknown, |line| Position::Line {
                    line,
                    column: message.column,
                });
                self.sink.push(
                    Diagnostic::new(
                        format!("{} - {}", drop_last_char(&message.message), rule_id),
                        "run eslint --fix",
                        file.clone(),
                        position,
                    )
                    .with_source(LINT_SOURCE),
                );
            }
        }

        self.advance(Stage::LintRun);
        Ok(())
    }

    fn check_json(&mut self) {
        for file in &self.data_files {
            let value = match self.json_formatter.parse(&file.content) {
                Ok(value) => value,
                Err(reason) => {
                    self.sink.push(
                        Diagnostic::new(
                            format!("json file failed to parse: {reason}"),
                            "fix formatting errors",
                            file.clone(),
                            Position::Unknown,
                        )
                        .with_source(JSON_SOURCE),
                    );
                    continue;
                }
            };

            let canonical = self.json_formatter.canonical(&value);
            if canonical.trim() != file.content.trim() {
                self.sink.push(
                    Diagnostic::new(
                        "json file needs proper formatting",
                        "run jsonlint --in-place",
                        file.clone(),
                        Position::Unknown,
                    )
                    .with_source(JSON_SOURCE),
                );
            }
        }
        self.advance(Stage::JsonChecked);
    }

    fn check_manifest(&mut self) -> Result<(), EnforcerError> {
        let manifest = self.config.manifest.clone();
        if !self.root.join(&manifest).exists() {
            info!("No manifest at {}, skipping version check", manifest.display());
            self.advance(Stage::ManifestChecked);
            return Ok(());
        }

        let file = self.files.read(&manifest)?;
        for offset in scanner::scan(&file.content, &self.caret_version) {
            self.sink.push(
                Diagnostic::new(
                    format!("versions in {} should be fixed", manifest.display()),
                    "remove ^",
                    file.clone(),
                    Position::Offset(offset),
                )
                .with_source(MANIFEST_SOURCE),
            );
        }

        self.advance(Stage::ManifestChecked);
        Ok(())
    }
}

/// Drops the trailing character (the lint engine's closing period).
fn drop_last_char(message: &str) -> &str {
    let mut chars = message.chars();
    chars.next_back();
    chars.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_builder_defaults() {
        let enforcer = Enforcer::builder().build().unwrap();
        assert_eq!(enforcer.root(), std::env::current_dir().unwrap());
        assert_eq!(enforcer.stage(), Stage::Init);
        assert_eq!(enforcer.config(), &Config::default());
    }

    #[test]
    fn relative_root_is_resolved_once() {
        let cwd = std::env::current_dir().unwrap();
        let enforcer = Enforcer::builder().root("./proj").build().unwrap();
        assert_eq!(enforcer.root(), cwd.join("proj"));
        assert!(enforcer.root().is_absolute());

        let abs = Enforcer::builder().root(&cwd).build().unwrap();
        assert_eq!(abs.root(), cwd);
    }

    #[test]
    fn fatal_messages_leave_causes_to_the_chain() {
        let err = EnforcerError::Tool(ToolError::Spawn {
            tool: "esdoc",
            command: PathBuf::from("node_modules/.bin/esdoc"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
        assert_eq!(err.to_string(), "External tool failed");

        let cause = err.source().unwrap();
        assert!(!cause.to_string().contains("no such file"));
        let root_cause = cause.source().unwrap();
        assert_eq!(root_cause.to_string(), "no such file");
    }

    #[test]
    fn suppressions_match_per_rule() {
        let mut config = Config::default();
        config
            .disable_rules
            .insert("ascii-only".to_string(), vec![r"^src/i18n/".to_string()]);
        config.doc_ignore = vec![r"\.test\.js$".to_string()];

        let s = Suppressions::compile(&config).unwrap();
        assert!(s.is_suppressed("ascii-only", "src/i18n/ru.js"));
        assert!(!s.is_suppressed("ascii-only", "src/app.js"));
        assert!(!s.is_suppressed("no-todo-tags", "src/i18n/ru.js"));
        assert!(s.is_doc_ignored("src/a.test.js"));
    }

    #[test]
    fn invalid_suppression_is_a_config_error() {
        let mut config = Config::default();
        config
            .disable_rules
            .insert("ascii-only".to_string(), vec!["(".to_string()]);
        assert!(matches!(
            Suppressions::compile(&config),
            Err(ConfigError::Pattern { .. })
        ));
    }

    #[test]
    fn drops_only_the_last_character() {
        assert_eq!(drop_last_char("Missing semicolon."), "Missing semicolon");
        assert_eq!(drop_last_char(""), "");
        assert_eq!(drop_last_char("é"), "");
    }
}
