//! Rule trait and the registry that indexes rules by identifier.

use crate::config::Config;
use crate::scanner;
use crate::types::{DiagnosticSink, SourceFile};

use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// A self-contained text-pattern check bound to a filename predicate.
///
/// Rules are stateless: one instance serves every file of a run, and calling
/// [`Rule::check`] twice on the same input appends the same diagnostics twice.
///
/// # Example
///
/// ```ignore
/// use code_enforcer_core::{Config, Diagnostic, DiagnosticSink, Position, Rule, SourceFile};
///
/// pub struct NoDebugger;
///
/// impl Rule for NoDebugger {
///     fn name(&self) -> &'static str { "no-debugger" }
///     fn filename_pattern(&self) -> &'static str { r".*\.js" }
///
///     fn check(&self, file: &SourceFile, _config: &Config, sink: &mut DiagnosticSink) {
///         if let Some(offset) = file.content.find("debugger;") {
///             sink.push(Diagnostic::new(
///                 "no debugger statements",
///                 "remove it",
///                 file.clone(),
///                 Position::Offset(offset),
///             ));
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case identifier of this rule (e.g., "ascii-only").
    ///
    /// This is the key used by `disableRules` in the configuration.
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Regular expression matched (unanchored) against a file's path to
    /// decide whether this rule applies to it.
    fn filename_pattern(&self) -> &'static str;

    /// Checks a single file, appending any problems to `sink`.
    fn check(&self, file: &SourceFile, config: &Config, sink: &mut DiagnosticSink);
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Errors raised while loading rules. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A rule's own pattern failed to compile.
    #[error("rule `{rule}` has an invalid pattern")]
    InvalidPattern {
        /// Identifier of the broken rule.
        rule: String,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// A rule is missing its identifier or filename pattern.
    #[error("rule `{rule}` is malformed: {reason}")]
    Malformed {
        /// Identifier of the broken rule (may be empty).
        rule: String,
        /// What is missing.
        reason: &'static str,
    },

    /// Two rules claim the same identifier.
    #[error("rule `{0}` is registered more than once")]
    Duplicate(String),
}

/// A rule together with its compiled filename predicate.
pub struct RegisteredRule {
    rule: RuleBox,
    filename_pattern: Regex,
}

impl RegisteredRule {
    /// The underlying rule.
    #[must_use]
    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    /// The rule's identifier.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    /// Whether the rule's filename pattern matches `file_name`.
    #[must_use]
    pub fn applies_to(&self, file_name: &str) -> bool {
        self.filename_pattern.is_match(file_name)
    }
}

impl std::fmt::Debug for RegisteredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("name", &self.name())
            .field("filename_pattern", &self.filename_pattern.as_str())
            .finish()
    }
}

/// All loaded rules, indexed by identifier and iterated in identifier order.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<RegisteredRule>,
}

impl RuleRegistry {
    /// Validates and indexes `rules`.
    ///
    /// Iteration order is sorted by identifier, so it does not depend on the
    /// order rules were handed in.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed, duplicate, or uncompilable rule.
    pub fn load<I>(rules: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = RuleBox>,
    {
        let mut loaded: Vec<RegisteredRule> = Vec::new();

        for rule in rules {
            let name = rule.name();
            if name.is_empty() {
                return Err(RegistryError::Malformed {
                    rule: String::new(),
                    reason: "missing identifier",
                });
            }
            if rule.filename_pattern().is_empty() {
                return Err(RegistryError::Malformed {
                    rule: name.to_string(),
                    reason: "missing filename pattern",
                });
            }
            if loaded.iter().any(|r| r.name() == name) {
                return Err(RegistryError::Duplicate(name.to_string()));
            }

            let filename_pattern = scanner::compile(rule.filename_pattern()).map_err(|e| {
                RegistryError::InvalidPattern {
                    rule: name.to_string(),
                    source: e,
                }
            })?;

            debug!("Loaded rule: {}", name);
            loaded.push(RegisteredRule {
                rule,
                filename_pattern,
            });
        }

        loaded.sort_by_key(RegisteredRule::name);
        Ok(Self { rules: loaded })
    }

    /// Looks up a rule by identifier.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredRule> {
        self.rules.iter().find(|r| r.name() == name)
    }

    /// Iterates rules in identifier order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegisteredRule> {
        self.rules.iter()
    }

    /// Identifiers of all loaded rules, in iteration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(RegisteredRule::name).collect()
    }

    /// Returns the number of loaded rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no rules are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
