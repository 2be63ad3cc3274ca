//! List rules command implementation.

use anyhow::{Context, Result};
use code_enforcer_rules::builtin_registry;

/// Runs the list-rules command.
pub fn run() -> Result<()> {
    let registry = builtin_registry().context("Failed to load built-in rules")?;

    println!("Available rules:\n");
    println!("{:<24} {:<10} Description", "Name", "Files");
    println!("{}", "-".repeat(80));

    for registered in registry.iter() {
        println!(
            "{:<24} {:<10} {}",
            registered.name(),
            registered.rule().filename_pattern(),
            registered.rule().description()
        );
    }

    println!("\nDisable a rule for some files in .code-enforcer.json, e.g.:");
    println!("  {{ \"disableRules\": {{ \"ascii-only\": [\"src/i18n/\"] }} }}");

    Ok(())
}
