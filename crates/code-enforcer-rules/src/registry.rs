//! Registration list of the built-in rules.
//!
//! New rules are added here; the enforcer never discovers rules at runtime.

use crate::{AsciiOnly, ConsoleCalls, NoExtensionImports, NoIndexImports, NoTodoTags};
use code_enforcer_core::{RegistryError, RuleBox, RuleRegistry};

fn invalid(rule: &'static str) -> impl FnOnce(regex::Error) -> RegistryError {
    move |source| RegistryError::InvalidPattern {
        rule: rule.to_string(),
        source,
    }
}

/// Returns every built-in rule, in identifier order.
///
/// # Errors
///
/// Returns an error if a rule's content pattern fails to compile.
pub fn all_rules() -> Result<Vec<RuleBox>, RegistryError> {
    Ok(vec![
        Box::new(AsciiOnly::new().map_err(invalid(crate::ascii_only::NAME))?),
        Box::new(ConsoleCalls::new().map_err(invalid(crate::console_calls::NAME))?),
        Box::new(NoExtensionImports::new().map_err(invalid(crate::no_extension_imports::NAME))?),
        Box::new(NoIndexImports::new().map_err(invalid(crate::no_index_imports::NAME))?),
        Box::new(NoTodoTags::new().map_err(invalid(crate::no_todo_tags::NAME))?),
    ])
}

/// Loads every built-in rule into a validated registry.
///
/// # Errors
///
/// Returns an error if any built-in rule fails to load.
pub fn builtin_registry() -> Result<RuleRegistry, RegistryError> {
    RuleRegistry::load(all_rules()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_loads() {
        let registry = builtin_registry().unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "ascii-only",
                "console-style-calls",
                "no-extension-imports",
                "no-index-imports",
                "no-todo-tags",
            ]
        );
    }

    #[test]
    fn test_every_rule_targets_js_files() {
        let registry = builtin_registry().unwrap();
        for rule in registry.iter() {
            assert!(rule.applies_to("src/app.js"), "{}", rule.name());
            assert!(!rule.applies_to("README.md"), "{}", rule.name());
            assert!(!rule.rule().description().is_empty(), "{}", rule.name());
        }
    }
}
